use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Errors that can occur during URL validation.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// Plain HTTP to a host other than the local machine.
    #[error("Insecure URL: {0} (plain http is only allowed for localhost)")]
    Insecure(String),
    /// A base URL carrying a query string or fragment.
    #[error("Base URL must not contain a query or fragment")]
    UnexpectedQuery,
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
}

/// Validates the content API base URL.
///
/// HTTPS is required unless the host is the local machine, where a CMS dev
/// server usually runs over plain HTTP. The returned URL always ends with a
/// `/` so that endpoint paths join below it instead of replacing its last
/// segment.
///
/// # Examples
///
/// ```
/// use cms_preview::util::validate_api_base_url;
///
/// let url = validate_api_base_url("https://cms.example.com/admin").unwrap();
/// assert_eq!(url.as_str(), "https://cms.example.com/admin/");
///
/// assert!(validate_api_base_url("http://cms.example.com").is_err());
/// assert!(validate_api_base_url("http://localhost:1337").is_ok());
/// ```
pub fn validate_api_base_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let mut url = Url::parse(url_str.trim())?;

    let host = url.host_str().ok_or(UrlValidationError::MissingHost)?;
    match url.scheme() {
        "https" => {}
        "http" if is_local_host(host) => {}
        "http" => return Err(UrlValidationError::Insecure(url.to_string())),
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(UrlValidationError::UnexpectedQuery);
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// Validates a URL before handing it to the system browser.
///
/// Only http and https are opened; anything else (`file:`, `javascript:`,
/// custom app schemes) is rejected.
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
    if url.host_str().is_none() {
        return Err(UrlValidationError::MissingHost);
    }
    Ok(url)
}

fn is_local_host(host: &str) -> bool {
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    // Strip brackets from IPv6 addresses for parsing
    let host_for_parse = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    host_for_parse
        .parse::<IpAddr>()
        .map(|ip| ip.is_loopback())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_https_base_accepted() {
        let url = validate_api_base_url("https://cms.example.com").unwrap();
        assert_eq!(url.as_str(), "https://cms.example.com/");
    }

    #[test]
    fn test_base_path_gets_trailing_slash() {
        let url = validate_api_base_url("https://cms.example.com/admin").unwrap();
        assert_eq!(url.path(), "/admin/");
        assert_eq!(
            url.join("api/sections").unwrap().as_str(),
            "https://cms.example.com/admin/api/sections"
        );
    }

    #[test]
    fn test_plain_http_only_for_loopback() {
        assert!(validate_api_base_url("http://localhost:1337").is_ok());
        assert!(validate_api_base_url("http://127.0.0.1:1337").is_ok());
        assert!(validate_api_base_url("http://[::1]:1337").is_ok());
        assert!(matches!(
            validate_api_base_url("http://cms.example.com"),
            Err(UrlValidationError::Insecure(_))
        ));
    }

    #[test]
    fn test_invalid_schemes() {
        assert!(matches!(
            validate_api_base_url("ftp://cms.example.com"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
        assert!(validate_api_base_url("not a url").is_err());
    }

    #[test]
    fn test_query_rejected() {
        assert!(matches!(
            validate_api_base_url("https://cms.example.com/?populate=deep"),
            Err(UrlValidationError::UnexpectedQuery)
        ));
        assert!(validate_api_base_url("https://cms.example.com/#top").is_err());
    }

    #[test]
    fn test_open_accepts_web_urls_only() {
        assert!(validate_url_for_open("https://example.com/watch?v=1").is_ok());
        assert!(validate_url_for_open("http://example.com").is_ok());
        assert!(validate_url_for_open("file:///etc/passwd").is_err());
        assert!(validate_url_for_open("javascript:alert(1)").is_err());
    }
}
