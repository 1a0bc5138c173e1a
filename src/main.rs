use clap::Parser;
use log::{LevelFilter, info, warn};
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

use querydesk::core::config::{self, CliOverrides};
use querydesk::tui;

#[derive(Parser)]
#[command(name = "querydesk", about = "Terminal client for a document query backend")]
struct Args {
    /// Backend base URL (overrides QUERYDESK_BASE_URL and the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Seconds to wait for a query before giving up
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log level written to querydesk.log (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to querydesk.log in current directory
    let level = args.log_level.parse().unwrap_or(LevelFilter::Debug);
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("querydesk.log") {
        let _ = WriteLogger::init(level, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        warn!("{}; falling back to defaults", e);
        config::QueryDeskConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            base_url: args.base_url,
            timeout_secs: args.timeout_secs,
        },
    );

    info!(
        "QueryDesk starting up (backend: {}, timeout: {}s)",
        resolved.base_url, resolved.timeout_secs
    );

    tui::run(resolved)
}
