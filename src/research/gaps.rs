//! Information-gap detection.
//!
//! After a research pass, the engine asks the completion service whether
//! critical information is still missing. The findings serialization sent
//! with the prompt is capped at a character budget to bound cost. Any
//! failure, completion error and unparseable output alike, is treated as
//! "no gaps found", which is the termination-safety default for the
//! self-query loop.

use crate::llm::CompletionClient;
use crate::types::InformationGap;
use crate::utils::{parse_structured, EngineConfig};
use std::sync::Arc;

/// Detects remaining information gaps against an objective.
pub struct GapDetector {
    client: Arc<dyn CompletionClient>,
    config: EngineConfig,
}

impl GapDetector {
    /// Build a detector over the given completion client.
    pub fn new(client: Arc<dyn CompletionClient>, config: EngineConfig) -> Self {
        Self { client, config }
    }

    /// One model call; returns an empty list on any failure.
    ///
    /// Gaps of every priority are returned; promotion to follow-up steps
    /// (high/critical only) is the queue's decision, not the detector's.
    pub async fn detect(&self, objective: &str, findings: &[String]) -> Vec<InformationGap> {
        let prompt = self.build_prompt(objective, findings);

        let text = match self.client.complete(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "gap detection call failed, treating as no gaps");
                return Vec::new();
            }
        };

        match parse_structured::<Vec<InformationGap>>(&text) {
            Ok(gaps) => {
                tracing::debug!(gaps = gaps.len(), "gap detection returned");
                gaps
            }
            Err(e) => {
                tracing::debug!(error = %e, "gap detection output unparseable, treating as no gaps");
                Vec::new()
            }
        }
    }

    fn build_prompt(&self, objective: &str, findings: &[String]) -> String {
        let mut serialized = String::new();
        for finding in findings {
            if serialized.len() + finding.len() + 3 > self.config.findings_char_budget {
                break;
            }
            serialized.push_str("- ");
            serialized.push_str(finding);
            serialized.push('\n');
        }
        if serialized.is_empty() {
            serialized.push_str("(no findings yet)\n");
        }

        format!(
            r#"You are a research completeness reviewer.

Objective: {objective}

Findings so far:
{serialized}
Identify critical information still missing to satisfy the objective.

Return ONLY a JSON array (empty if nothing critical is missing):
[
  {{
    "topic": "<short topic label>",
    "rationale": "<why this matters>",
    "priority": "critical",
    "query": "<ready-to-execute follow-up search query>"
  }}
]

Valid priorities: critical, high, medium, low."#
        )
    }
}
