//! netquery command line entry point
//!
//! Runs a single query with the configured settings, or escapes text for a URL.

use anyhow::{bail, Result};
use netquery::{CancellationToken, NetworkSettings, QueryClient};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("-h") | Some("--help") => {
            print_usage();
            Ok(())
        }
        Some("-V") | Some("--version") => {
            println!("netquery {}", netquery::VERSION);
            Ok(())
        }
        Some("escape") => {
            if args.len() < 2 {
                bail!("missing text to escape");
            }
            println!("{}", QueryClient::escape(&args[1..].join(" ")));
            Ok(())
        }
        Some(url) => query(url).await,
    }
}

async fn query(url: &str) -> Result<()> {
    let settings = load_settings()?;
    let client = QueryClient::with_settings(&settings)?;
    info!("Querying {} (timeout {} ms)", url, settings.timeout_ms);

    // Ctrl-C cancels the in-flight request
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });

    let response = client.get_query_response(url, &cancel).await;
    client.dispose();

    match response.body {
        Some(body) => {
            println!("{}", body);
            Ok(())
        }
        None => bail!("{}", response.status),
    }
}

/// Load settings from file or use defaults
fn load_settings() -> Result<NetworkSettings> {
    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("netquery/settings.yml"));
    }

    // Check environment variable first
    if let Ok(path) = std::env::var("NETQUERY_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            paths.insert(0, path);
        } else {
            warn!("Settings file {} does not exist", path.display());
        }
    }

    let mut settings = match paths.iter().find(|path| path.exists()) {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            NetworkSettings::from_file(path)?
        }
        None => {
            info!("No settings file found, using defaults");
            NetworkSettings::default()
        }
    };
    settings.merge_env();
    Ok(settings)
}

fn print_usage() {
    println!(
        r#"
netquery v{}
Issue a single GET request with a timeout and user agent

USAGE:
    netquery <URL>
    netquery escape <TEXT>...

OPTIONS:
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    NETQUERY_SETTINGS_PATH  Path to settings.yml
    NETQUERY_TIMEOUT_MS     Request timeout in milliseconds
    NETQUERY_USER_AGENT     User-Agent header value
    RUST_LOG                Log filter (default: info)
"#,
        netquery::VERSION
    );
}
