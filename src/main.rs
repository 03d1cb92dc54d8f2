use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use telegram_signal_extractor::config::Config;
use telegram_signal_extractor::pipeline::Pipeline;
use telegram_signal_extractor::source::TelegramSource;
use telegram_signal_extractor::store::CsvStore;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let source = Box::new(TelegramSource::new(&cfg.bot_token));
    let store = Box::new(CsvStore::new(&cfg));

    let mut pipeline = Pipeline::new(cfg, source, store);
    pipeline.run().await?;

    Ok(())
}
