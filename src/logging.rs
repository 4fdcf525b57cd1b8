use crate::constant::LOG_ENV_VAR;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global subscriber. Logs go to stderr so command output stays clean on stdout.
pub fn setup_logger() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(if cfg!(debug_assertions) {
            LevelFilter::DEBUG.into()
        } else {
            LevelFilter::INFO.into()
        })
        .with_env_var(LOG_ENV_VAR)
        .from_env_lossy();

    let fmt = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(fmt)
        .with(env_filter)
        .try_init();
}
