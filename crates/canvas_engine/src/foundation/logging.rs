//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`
pub fn init() -> Result<(), log::SetLoggerError> {
    env_logger::try_init()
}

/// Initialize the logging system with a default filter
///
/// `RUST_LOG`, when set, still takes precedence over `default_level`.
pub fn init_with_level(default_level: &str) -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .try_init()
}
