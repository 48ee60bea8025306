//! # Observability
//!
//! Structured logging for satlink applications. The engine itself only emits
//! `tracing` events; installing a subscriber is up to the binary.

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
