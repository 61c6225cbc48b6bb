//! Logging bootstrap for embedding applications.

mod init;

pub use init::{LoggingConfig, init_logging};
