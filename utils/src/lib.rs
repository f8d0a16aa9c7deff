//! Shared utilities for the Warden wallet core.

pub mod logging;
pub mod time;

pub use logging::{init_logging, init_tracing, LogFormat, LoggingError};
pub use time::{describe_expiration, format_duration};
