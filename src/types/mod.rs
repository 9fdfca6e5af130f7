//! Core types for the research orchestration engine.
//!
//! Everything the engine exchanges with its collaborators lives here: the
//! step/plan data model produced by decomposition, the gap model produced by
//! gap detection, the aggregate returned to the caller, and the crate-wide
//! error type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============= Step Types =============

/// Closed set of research step kinds.
///
/// Each kind routes to a fixed tool capability in the
/// [`StepExecutor`](crate::research::executor::StepExecutor); the set is
/// exhaustively matched so adding a kind is a compile-time event, not a
/// stringly-typed runtime surprise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepType {
    /// Broad first-pass search on the objective.
    InitialScan,
    /// Focused follow-up search on a narrower query.
    DeepDive,
    /// Competitor/landscape scan.
    CompetitorAnalysis,
    /// Cross-check a claim against two independent sources.
    Validation,
    /// Structural no-op used to join branches; never calls a tool.
    Synthesis,
}

/// Advisory step priority. Does not affect scheduling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepPriority {
    /// Triage first.
    High,
    /// Default.
    Medium,
    /// Triage last.
    Low,
}

/// Per-step state machine: `pending -> in-progress -> {completed | failed}`.
///
/// Terminal states are final. Only the step executor performs transitions;
/// re-execution happens by creating a new step, never by resetting one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    /// Created, not yet dispatched.
    #[default]
    Pending,
    /// Currently executing.
    InProgress,
    /// Finished successfully. Terminal.
    Completed,
    /// Tool error, timeout, or empty payload. Terminal.
    Failed,
}

impl StepStatus {
    /// Whether the step has reached a final state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Failed)
    }
}

/// One unit of research work.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchStep {
    /// Unique within a plan; stable for the lifetime of the run.
    pub id: String,
    /// Routes the step to a tool capability.
    #[serde(rename = "type")]
    pub step_type: StepType,
    /// Concrete text query issued to the selected tool.
    pub query: String,
    /// Advisory triage hint; never affects scheduling.
    #[serde(default = "default_priority")]
    pub priority: StepPriority,
    /// Ids of steps that must reach a terminal state before this one starts.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Current state-machine position.
    #[serde(default)]
    pub status: StepStatus,
    /// Raw tool payload; `None` until the step completes with content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<serde_json::Value>,
    /// Short text fragments extracted from `results`.
    #[serde(default)]
    pub insights: Vec<String>,
    /// Wall-clock execution time, populated by the executor.
    #[serde(default)]
    pub duration_ms: u64,
}

fn default_priority() -> StepPriority {
    StepPriority::Medium
}

impl ResearchStep {
    /// Create a pending step with no dependencies.
    pub fn new(id: impl Into<String>, step_type: StepType, query: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            step_type,
            query: query.into(),
            priority: StepPriority::Medium,
            dependencies: Vec::new(),
            status: StepStatus::Pending,
            results: None,
            insights: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Builder-style dependency declaration, used by tests and plan fixtures.
    pub fn with_dependencies(mut self, deps: Vec<String>) -> Self {
        self.dependencies = deps;
        self
    }

    /// Builder-style priority override.
    pub fn with_priority(mut self, priority: StepPriority) -> Self {
        self.priority = priority;
        self
    }
}

// ============= Plan Types =============

/// Output of objective decomposition: a DAG of steps.
///
/// A plan is structurally immutable after creation. Self-queries add *new*
/// steps with fresh ids downstream; they never edit existing ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchPlan {
    /// Restated goal, kept for traceability.
    pub objective: String,
    /// The step DAG, in declaration order.
    pub steps: Vec<ResearchStep>,
    /// Whether same-level steps may run concurrently. The scheduler is
    /// correct either way; `false` serializes levels for rate-limit or cost
    /// reasons.
    #[serde(default)]
    pub can_parallelize: bool,
}

impl ResearchPlan {
    /// The deterministic single-step plan used when decomposition fails.
    pub fn fallback(objective: &str) -> Self {
        Self {
            objective: objective.to_string(),
            steps: vec![ResearchStep::new("step-1", StepType::InitialScan, objective)],
            can_parallelize: false,
        }
    }
}

// ============= Gap Types =============

/// Gap priority as reported by the detection model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapPriority {
    /// Must be closed before the findings are usable.
    Critical,
    /// Worth a follow-up query.
    High,
    /// Informational only.
    Medium,
    /// Informational only.
    Low,
}

impl GapPriority {
    /// Only `critical` and `high` gaps are promoted to follow-up steps;
    /// `medium`/`low` gaps are informational.
    pub fn is_actionable(&self) -> bool {
        matches!(self, GapPriority::Critical | GapPriority::High)
    }
}

/// A piece of missing information surfaced after a research pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InformationGap {
    /// Short label naming the missing information.
    pub topic: String,
    /// Why the detector considers it missing.
    #[serde(default)]
    pub rationale: String,
    /// Drives promotion to a follow-up step.
    pub priority: GapPriority,
    /// Ready-to-execute follow-up query.
    pub query: String,
}

// ============= Tool Payload Types =============

/// Unopinionated bag of fields returned by a research tool.
///
/// The engine accesses these structurally and must not fail when fields are
/// absent; tools are free to populate any subset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawResult {
    /// Result or article title.
    pub title: Option<String>,
    /// Short summary text.
    pub description: Option<String>,
    /// Full body text.
    pub content: Option<String>,
    /// Body text as markdown, when the tool renders it.
    pub markdown: Option<String>,
    /// Source URL.
    pub url: Option<String>,
    /// Publication timestamp, as reported by the source.
    pub published_at: Option<String>,
    /// Nested per-item results for list-shaped tools (search hits, feeds).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<RawResult>,
}

// ============= Run Types =============

/// Caller-supplied context threaded through decomposition prompts.
///
/// Owned per run; there is no ambient cross-run state.
#[derive(Debug, Clone)]
pub struct ResearchContext {
    /// Organization identity, so queries can be scoped to the caller.
    pub organization: Option<String>,
    /// Entities (products, competitors) already known to the caller.
    pub known_entities: Vec<String>,
    /// Current date, so generated queries can be time-scoped.
    pub current_date: DateTime<Utc>,
}

impl Default for ResearchContext {
    fn default() -> Self {
        Self {
            organization: None,
            known_entities: Vec::new(),
            current_date: Utc::now(),
        }
    }
}

/// Final output of an orchestration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedResult {
    /// Every step that reached a terminal state, including failed ones.
    pub completed_steps: Vec<ResearchStep>,
    /// Raw results keyed by step id (steps without results are absent).
    pub results_by_step_id: HashMap<String, serde_json::Value>,
    /// Deduplicated insight strings across all steps and iterations.
    pub key_findings: Vec<String>,
    /// Count of steps that finished `completed`.
    pub steps_completed: usize,
    /// Count of steps that finished `failed`.
    pub steps_failed: usize,
    /// Number of self-query iterations executed.
    pub self_query_iterations: usize,
    /// Total run wall-clock time.
    pub duration_ms: u64,
}

// ============= Error Types =============

/// Crate-wide error type.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The dependency graph is cyclic or references unknown step ids.
    /// Fatal for the run; no partial execution is attempted once detected.
    #[error("invalid research plan: {reason} (steps: {step_ids:?})")]
    InvalidPlan {
        /// What makes the plan unexecutable.
        reason: String,
        /// The steps involved (stuck in a cycle, duplicated, or unresolved).
        step_ids: Vec<String>,
    },

    /// The external completion service failed outright.
    #[error("completion service error: {0}")]
    Completion(String),

    /// A research tool failed. `transient` marks 5xx-class failures that a
    /// retry wrapper may re-attempt; permanent failures must not be retried.
    #[error("tool '{tool}' failed: {message}")]
    Tool {
        /// Name of the failing tool.
        tool: String,
        /// Tool-reported failure description.
        message: String,
        /// Whether a bounded retry may succeed.
        transient: bool,
    },

    /// A tool call exceeded its time bound.
    #[error("tool '{tool}' timed out after {timeout_ms}ms")]
    Timeout {
        /// Name of the timed-out tool.
        tool: String,
        /// The bound that was exceeded.
        timeout_ms: u64,
    },

    /// No tool registered for a required capability.
    #[error("no tool registered for capability '{0}'")]
    MissingTool(String),

    /// Structured output could not be parsed out of free text.
    #[error("structured parse error: {0}")]
    Parse(String),

    /// Invalid caller input or configuration value.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl EngineError {
    /// Whether a bounded retry is worth attempting.
    pub fn is_transient(&self) -> bool {
        matches!(self, EngineError::Tool { transient: true, .. })
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_status_terminal() {
        assert!(!StepStatus::Pending.is_terminal());
        assert!(!StepStatus::InProgress.is_terminal());
        assert!(StepStatus::Completed.is_terminal());
        assert!(StepStatus::Failed.is_terminal());
    }

    #[test]
    fn test_step_wire_format() {
        let step = ResearchStep::new("step-1", StepType::InitialScan, "rust adoption 2026");
        let json = serde_json::to_value(&step).unwrap();

        assert_eq!(json["id"], "step-1");
        assert_eq!(json["type"], "initial-scan");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["priority"], "medium");
        assert!(json.get("results").is_none());
    }

    #[test]
    fn test_step_deserializes_with_defaults() {
        // Decomposition output routinely omits optional fields.
        let step: ResearchStep =
            serde_json::from_str(r#"{"id": "a", "type": "deep-dive", "query": "q"}"#).unwrap();

        assert_eq!(step.status, StepStatus::Pending);
        assert_eq!(step.priority, StepPriority::Medium);
        assert!(step.dependencies.is_empty());
        assert!(step.insights.is_empty());
    }

    #[test]
    fn test_fallback_plan_shape() {
        let plan = ResearchPlan::fallback("state of the market");

        assert_eq!(plan.objective, "state of the market");
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(plan.steps[0].id, "step-1");
        assert_eq!(plan.steps[0].step_type, StepType::InitialScan);
        assert_eq!(plan.steps[0].query, "state of the market");
        assert!(plan.steps[0].dependencies.is_empty());
        assert!(!plan.can_parallelize);
    }

    #[test]
    fn test_gap_priority_promotion() {
        assert!(GapPriority::Critical.is_actionable());
        assert!(GapPriority::High.is_actionable());
        assert!(!GapPriority::Medium.is_actionable());
        assert!(!GapPriority::Low.is_actionable());
    }

    #[test]
    fn test_raw_result_tolerates_missing_fields() {
        let raw: RawResult = serde_json::from_str(r#"{"title": "only a title"}"#).unwrap();
        assert_eq!(raw.title.as_deref(), Some("only a title"));
        assert!(raw.description.is_none());
        assert!(raw.items.is_empty());
    }

    #[test]
    fn test_error_transient_classification() {
        let transient = EngineError::Tool {
            tool: "search".into(),
            message: "502 bad gateway".into(),
            transient: true,
        };
        let permanent = EngineError::Tool {
            tool: "search".into(),
            message: "400 bad request".into(),
            transient: false,
        };
        let timeout = EngineError::Timeout {
            tool: "search".into(),
            timeout_ms: 30_000,
        };

        assert!(transient.is_transient());
        assert!(!permanent.is_transient());
        assert!(!timeout.is_transient());
    }
}
