//! External completion-service seam.
//!
//! Decomposition and gap detection both go through a single text-completion
//! call; the engine only ever consumes the structured payload it digs out of
//! the response. Concrete clients (hosted APIs, local inference) live with
//! the caller; the engine depends on the [`client::CompletionClient`] trait
//! alone.

/// Completion client trait and helpers.
pub mod client;

pub use client::CompletionClient;
