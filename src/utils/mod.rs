//! Cross-cutting utilities: configuration and structured-output parsing.

/// Engine configuration with env overrides.
pub mod config;
/// Structured-payload extraction from free-form model output.
pub mod parse;

pub use config::EngineConfig;
pub use parse::{parse_structured, ParseError};
