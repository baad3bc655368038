//! # ruleval-log
//!
//! Logger setup shared by the ruleval binaries.
//!
//! ```rust,no_run
//! use ruleval_log::{Config, LoggerBuilder};
//!
//! let _guard = LoggerBuilder::from_config(Config::from_env()).build()?;
//! tracing::info!("ready");
//! # Ok::<(), ruleval_log::LogError>(())
//! ```

mod builder;
mod config;
mod error;
mod macros;
mod timer;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Format};
pub use error::{LogError, LogResult};
pub use timer::TimerGuard;

/// Re-exported for the macros.
pub use tracing::{debug, error, info, trace, warn};

/// Initializes logging with [`Config::from_env`].
pub fn auto_init() -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(Config::from_env()).build()
}
