//! # Warden Log
//!
//! Subscriber setup for warden binaries. Library crates only emit `tracing`
//! events; a binary calls one of the init functions once at startup and keeps
//! the returned [`LoggerGuard`] alive until exit.
//!
//! ```no_run
//! fn main() -> warden_log::LogResult<()> {
//!     let _guard = warden_log::auto_init()?;
//!     tracing::info!(port = 8080, "Server starting");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod builder;
mod config;
mod error;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Format};
pub use error::{LogError, LogResult};

/// Pick a configuration from the environment, falling back to the build
/// profile's preset, and install it.
pub fn auto_init() -> LogResult<LoggerGuard> {
    if std::env::var(config::LEVEL_VAR).is_ok() || std::env::var("RUST_LOG").is_ok() {
        init_with(Config::from_env())
    } else if cfg!(debug_assertions) {
        init_with(Config::development())
    } else {
        init_with(Config::production())
    }
}

/// Initialize with the default configuration.
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Config::default())
}

/// Initialize with a custom configuration.
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}
