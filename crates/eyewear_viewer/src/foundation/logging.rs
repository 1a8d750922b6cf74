//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with a default filter
///
/// `RUST_LOG` still wins when it is set, so a settings file can pick a
/// sensible default without taking control away from the shell.
pub fn init_with_level(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    // A second initialisation (tests, embedding apps) is not an error for us
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialised, keeping existing configuration");
    }
}
