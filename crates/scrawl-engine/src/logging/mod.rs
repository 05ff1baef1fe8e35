//! Logger initialization over the standard `log` facade.

mod init;

pub use init::{LoggingConfig, init_logging};
