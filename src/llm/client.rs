//! Completion client abstraction.

use crate::types::Result;
use async_trait::async_trait;

/// Text-completion seam for decomposition and gap detection.
///
/// Implementations wrap whatever provider the caller runs; the engine issues
/// a prompt and receives free text, from which it parses an embedded
/// structured payload. Every call site treats the call as "may degrade":
/// failures here fall back to deterministic defaults, they never abort a run.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Issue one prompt and return the raw completion text.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}
