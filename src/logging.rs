use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "EDUWATCH_LOG";

/// Installs the fmt subscriber. Filter comes from `EDUWATCH_LOG`, then
/// `RUST_LOG`, then `info`. Safe to call more than once.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
