//! Single-step execution.
//!
//! The executor owns the per-step state machine
//! (`pending -> in-progress -> {completed | failed}`), routes each step type
//! to its tool capability, time-bounds every external call, and extracts a
//! small set of insight snippets from the raw payload so downstream
//! aggregation stays bounded regardless of payload size.
//!
//! Failure of one step never aborts the run and never blocks siblings; it is
//! recorded on the step and visible in the final aggregate.

use crate::tools::{ResearchTool, ToolKind, ToolRegistry};
use crate::types::{EngineError, RawResult, ResearchStep, Result, StepStatus, StepType};
use crate::utils::EngineConfig;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, timeout};

/// Executes one research step against the tool registry.
pub struct StepExecutor {
    registry: Arc<ToolRegistry>,
    config: EngineConfig,
}

impl StepExecutor {
    /// Build an executor over the given tool registry.
    pub fn new(registry: Arc<ToolRegistry>, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    /// Run a step to a terminal state.
    ///
    /// Infallible by design: tool errors, timeouts, and empty payloads all
    /// land as `status = failed` on the returned step. A step already in a
    /// terminal state is returned untouched: terminal states are final and
    /// re-execution only ever happens through a fresh step.
    pub async fn execute(&self, mut step: ResearchStep) -> ResearchStep {
        if step.status.is_terminal() {
            return step;
        }

        step.status = StepStatus::InProgress;
        tracing::debug!(step = %step.id, step_type = ?step.step_type, "executing step");
        let started = Instant::now();

        let outcome = self.dispatch(&step).await;
        step.duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(Some((results, insights))) => {
                step.results = Some(results);
                step.insights = insights;
                step.status = StepStatus::Completed;
                tracing::debug!(
                    step = %step.id,
                    insights = step.insights.len(),
                    duration_ms = step.duration_ms,
                    "step completed"
                );
            }
            Ok(None) => {
                // Synthesis steps are structural no-ops.
                step.status = StepStatus::Completed;
            }
            Err(e) => {
                tracing::warn!(step = %step.id, error = %e, "step failed");
                step.results = None;
                step.insights.clear();
                step.status = StepStatus::Failed;
            }
        }

        step
    }

    /// Route the step type to its tool capability.
    async fn dispatch(&self, step: &ResearchStep) -> Result<Option<(Value, Vec<String>)>> {
        match step.step_type {
            StepType::InitialScan | StepType::DeepDive => {
                let raw = self.search_with_fallback(&step.query).await?;
                let insights = self.extract_insights(&raw);
                Ok(Some((serde_json::to_value(&raw).unwrap_or(Value::Null), insights)))
            }
            StepType::CompetitorAnalysis => {
                let tool = self.registry.require(ToolKind::CompetitorScan)?;
                let raw = self.call_tool(&tool, &step.query).await?;
                let insights = self.extract_insights(&raw);
                Ok(Some((serde_json::to_value(&raw).unwrap_or(Value::Null), insights)))
            }
            StepType::Validation => {
                // Two independent payloads, stored side by side. The engine
                // deliberately does not reconcile them; that is left to the
                // caller and to insight extraction.
                let primary = self.search_with_fallback(&step.query).await?;
                let validator = self.registry.require(ToolKind::Validator)?;
                let second = self.call_tool(&validator, &step.query).await?;

                let mut insights = self.extract_insights(&primary);
                insights.extend(self.extract_insights(&second));
                insights.truncate(self.config.max_insights_per_step);

                let results = json!({
                    "primary": serde_json::to_value(&primary).unwrap_or(Value::Null),
                    "validator": serde_json::to_value(&second).unwrap_or(Value::Null),
                });
                Ok(Some((results, insights)))
            }
            StepType::Synthesis => Ok(None),
        }
    }

    /// Search via the primary tool, falling back to the secondary when the
    /// primary is unregistered or its call fails.
    async fn search_with_fallback(&self, query: &str) -> Result<RawResult> {
        let secondary = self.registry.get(ToolKind::SecondarySearch);

        if let Some(primary) = self.registry.get(ToolKind::PrimarySearch) {
            match self.call_tool(&primary, query).await {
                Ok(raw) => return Ok(raw),
                Err(err) => {
                    if let Some(fallback) = secondary {
                        tracing::warn!(
                            error = %err,
                            fallback = fallback.name(),
                            "primary search failed, using secondary"
                        );
                        return self.call_tool(&fallback, query).await;
                    }
                    return Err(err);
                }
            }
        }

        if let Some(fallback) = secondary {
            return self.call_tool(&fallback, query).await;
        }
        Err(EngineError::MissingTool(ToolKind::PrimarySearch.to_string()))
    }

    /// One tool invocation with a time bound and a bounded retry for
    /// transient failures. Timeouts are not retried (fire-and-timeout); a
    /// successful call with no usable content is a permanent failure.
    async fn call_tool(&self, tool: &Arc<dyn ResearchTool>, query: &str) -> Result<RawResult> {
        let attempts = self.config.retry_attempts.max(1);

        for attempt in 1..=attempts {
            match timeout(self.config.step_timeout(), tool.run(query)).await {
                Ok(Ok(raw)) => {
                    if is_empty(&raw) {
                        return Err(EngineError::Tool {
                            tool: tool.name().to_string(),
                            message: "returned no usable content".to_string(),
                            transient: false,
                        });
                    }
                    return Ok(raw);
                }
                Ok(Err(err)) => {
                    if err.is_transient() && attempt < attempts {
                        tracing::warn!(
                            tool = tool.name(),
                            attempt,
                            error = %err,
                            "transient tool failure, retrying"
                        );
                        sleep(self.config.retry_delay()).await;
                        continue;
                    }
                    return Err(err);
                }
                Err(_) => {
                    return Err(EngineError::Timeout {
                        tool: tool.name().to_string(),
                        timeout_ms: self.config.step_timeout_ms,
                    });
                }
            }
        }

        // attempts >= 1, so every path above returns first.
        Err(EngineError::Tool {
            tool: tool.name().to_string(),
            message: "exhausted retry attempts".to_string(),
            transient: false,
        })
    }

    /// Pull at most `max_insights_per_step` short snippets out of a payload:
    /// the top-level description, the body text, then per-item snippets.
    fn extract_insights(&self, raw: &RawResult) -> Vec<String> {
        let budget = self.config.insight_char_budget;
        let mut insights = Vec::new();

        if let Some(description) = raw.description.as_deref() {
            push_snippet(&mut insights, description, budget);
        }
        if let Some(body) = raw.content.as_deref().or(raw.markdown.as_deref()) {
            push_snippet(&mut insights, body, budget);
        }
        for item in &raw.items {
            if insights.len() >= self.config.max_insights_per_step {
                break;
            }
            let snippet = match (item.title.as_deref(), item.description.as_deref()) {
                (Some(title), Some(desc)) => format!("{title}: {desc}"),
                (Some(title), None) => title.to_string(),
                (None, Some(desc)) => desc.to_string(),
                (None, None) => match item.content.as_deref() {
                    Some(content) => content.to_string(),
                    None => continue,
                },
            };
            push_snippet(&mut insights, &snippet, budget);
        }

        insights.truncate(self.config.max_insights_per_step);
        insights
    }
}

fn push_snippet(insights: &mut Vec<String>, text: &str, budget: usize) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }
    insights.push(truncate_chars(trimmed, budget));
}

/// Truncate on a character boundary; raw payloads are not guaranteed ASCII.
fn truncate_chars(text: &str, budget: usize) -> String {
    match text.char_indices().nth(budget) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// A payload with no text fields and no items carries nothing to aggregate.
fn is_empty(raw: &RawResult) -> bool {
    raw.title.is_none()
        && raw.description.is_none()
        && raw.content.is_none()
        && raw.markdown.is_none()
        && raw.items.is_empty()
}
