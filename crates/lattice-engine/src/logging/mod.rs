//! Logging utilities.
//!
//! Centralizes logger initialization. Library code only talks to the `log`
//! facade; the binary decides when and how `env_logger` is installed.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
