use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize structured logging for the CLI.
///
/// Defaults to `warn` level unless overridden by `CUELINE_LOG`. Logs go to
/// stderr so stdout stays clean for the batch summary.
pub fn init() {
    let filter = EnvFilter::builder()
        .with_env_var("CUELINE_LOG")
        .with_default_directive(tracing::level_filters::LevelFilter::WARN.into())
        .from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
