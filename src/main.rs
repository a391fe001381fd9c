use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use cms_preview::app::{deep_link_frame, App, AppEvent};
use cms_preview::config::{config_dir, Config};
use cms_preview::content::{ContentClient, ContentLoader, Granularity};
use cms_preview::theme::ThemeVariant;
use cms_preview::ui;

/// Base delay for API retries; doubles per attempt.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

#[derive(Parser, Debug)]
#[command(
    name = "cms-preview",
    about = "Preview headless-CMS content as the mobile app lays it out"
)]
struct Args {
    /// Config file (default: ~/.config/cms-preview/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Read content from a JSON snapshot instead of the API
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Which record type to fetch and group from
    #[arg(long, value_enum)]
    source: Option<Granularity>,

    /// Print the built home screen as JSON and exit
    #[arg(long)]
    dump: bool,

    /// Open directly on the collection with this id
    #[arg(long, value_name = "ID")]
    collection: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.dump);

    let config_path = args.config.clone().or_else(Config::default_path);
    let config = match &config_path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    tracing::debug!(?config, "Effective configuration");

    let granularity = args.source.unwrap_or(config.source);
    let loader = build_loader(&args, &config)?;

    if args.dump {
        return dump(&loader, granularity, args.collection).await;
    }

    let theme_variant = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.theme, "Unknown theme, using dark");
        ThemeVariant::Dark
    });

    let mut app = App::new(loader, granularity, theme_variant);
    app.default_bg = config.default_bg_color.clone();
    app.pending_deep_link = args.collection;

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}

/// Logs go to a file while the TUI owns the terminal, and to stderr for `--dump`.
fn init_tracing(dump: bool) {
    let filter = tracing_subscriber::EnvFilter::from_default_env();

    if dump {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return;
    }

    let log_file = config_dir().and_then(|dir| {
        std::fs::create_dir_all(&dir).ok()?;
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("cms-preview.log"))
            .ok()
    });

    match log_file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init(),
        // Nowhere to log without corrupting the TUI
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .init(),
    }
}

fn build_loader(args: &Args, config: &Config) -> Result<ContentLoader> {
    if let Some(path) = &args.snapshot {
        return Ok(ContentLoader::Snapshot(path.clone()));
    }

    let http = reqwest::Client::builder()
        .user_agent(concat!("cms-preview/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let client = ContentClient::new(http, &config.api_base_url, config.api_token())
        .with_context(|| format!("Invalid api_base_url '{}'", config.api_base_url))?
        .with_timeout(config.request_timeout())
        .with_retry(config.max_retries(), RETRY_BASE_DELAY);

    Ok(ContentLoader::Api(client))
}

/// Print the home screen (and the deep-link frame, if asked) as JSON.
async fn dump(
    loader: &ContentLoader,
    granularity: Granularity,
    collection: Option<i64>,
) -> Result<()> {
    let batch = loader.load(granularity).await?;
    let output = batch.build();

    for warning in &output.warnings {
        eprintln!("warning: {}", warning);
    }
    if output.skipped_orphans > 0 {
        eprintln!(
            "warning: {} item(s) without a collection were skipped",
            output.skipped_orphans
        );
    }

    let home = output.view_model.into_home();
    let json = match collection {
        Some(id) => {
            let frame = deep_link_frame(&home, id)
                .with_context(|| format!("Collection {} not found", id))?;
            serde_json::to_string_pretty(&serde_json::json!({ "home": home, "frame": frame }))?
        }
        None => serde_json::to_string_pretty(&home)?,
    };
    println!("{}", json);
    Ok(())
}
