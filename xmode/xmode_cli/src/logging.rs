use anyhow::Context;
use tracing_subscriber::FmtSubscriber;

use xmode_core::LogLevel;

/// Install the global subscriber, writing to stderr at `level`
pub fn init(level: LogLevel) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level.to_tracing_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install the log subscriber")
}
