//! Common utilities and configuration shared across relsql crates.
//!
//! - **Configuration**: Strongly typed generator configuration (`config`).
//! - **Logging**: Literal redaction for generated SQL (`scrubber`).
pub mod config;
pub mod scrubber;
