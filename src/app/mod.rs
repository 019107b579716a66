//! Application glue module
//!
//! Configuration and logging.

mod config;
pub mod logging;

pub use config::{Config, ConfigError, ACS_FIRST};
pub use logging::DebugLevel;
