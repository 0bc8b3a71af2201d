use anyhow::Result;
use tracing_subscriber::EnvFilter;

use tiny_url::config::{self, Config};
use tiny_url::server;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env()?;

    init_tracing(&config);
    config.print_summary();

    server::run(config).await
}

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` (already folded into the config) and
/// supports full directive syntax, e.g. `tiny_url=debug,sqlx=warn`.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::new(&config.log_level);
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
