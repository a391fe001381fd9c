//! Utility functions shared by the content client and the terminal UI.
//!
//! - **URL validation**: content API base URLs and links opened in the browser
//! - **Text processing**: terminal width, truncation and control-character stripping

mod text;
mod url_validator;

pub use text::{display_width, single_line, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_api_base_url, validate_url_for_open, UrlValidationError};
