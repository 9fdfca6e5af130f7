//! Objective decomposition.
//!
//! One call to the external completion service turns a free-form objective
//! into a [`ResearchPlan`]. The response is parsed structurally and
//! validated (non-empty steps, unique ids, acyclic dependencies); anything
//! short of that degrades to the deterministic single-step fallback plan.
//! Decomposition never errors and is never retried; the fallback is always
//! usable.

use crate::llm::CompletionClient;
use crate::research::scheduler::DependencyScheduler;
use crate::types::{ResearchContext, ResearchPlan, Result, StepStatus};
use crate::utils::parse_structured;
use std::sync::Arc;

/// Converts an objective into a research plan via the completion service.
pub struct PlanDecomposer {
    client: Arc<dyn CompletionClient>,
}

impl PlanDecomposer {
    /// Build a decomposer over the given completion client.
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Decompose an objective into a validated plan.
    ///
    /// Degrades to [`ResearchPlan::fallback`] on completion failure,
    /// unparseable output, or a structurally invalid plan.
    pub async fn decompose(&self, objective: &str, context: &ResearchContext) -> ResearchPlan {
        let prompt = self.build_prompt(objective, context);

        let text = match self.client.complete(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "decomposition call failed, using fallback plan");
                return ResearchPlan::fallback(objective);
            }
        };

        let plan = match parse_structured::<ResearchPlan>(&text) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!(error = %e, "decomposition output unparseable, using fallback plan");
                return ResearchPlan::fallback(objective);
            }
        };

        match Self::validate(plan, objective) {
            Ok(plan) => {
                tracing::info!(
                    steps = plan.steps.len(),
                    can_parallelize = plan.can_parallelize,
                    model = self.client.model_name(),
                    "objective decomposed"
                );
                plan
            }
            Err(e) => {
                tracing::warn!(error = %e, "decomposed plan invalid, using fallback plan");
                ResearchPlan::fallback(objective)
            }
        }
    }

    /// Structural validation plus normalization of model-populated fields.
    fn validate(mut plan: ResearchPlan, objective: &str) -> Result<ResearchPlan> {
        if plan.steps.is_empty() {
            return Err(crate::types::EngineError::InvalidPlan {
                reason: "plan has no steps".to_string(),
                step_ids: Vec::new(),
            });
        }

        // The model restates the objective; keep ours when it drops it.
        if plan.objective.trim().is_empty() {
            plan.objective = objective.to_string();
        }

        // Models occasionally echo execution state; steps always start fresh.
        for step in &mut plan.steps {
            step.status = StepStatus::Pending;
            step.results = None;
            step.insights.clear();
            step.duration_ms = 0;
        }

        DependencyScheduler::level(&plan.steps)?;
        Ok(plan)
    }

    fn build_prompt(&self, objective: &str, context: &ResearchContext) -> String {
        let organization = context.organization.as_deref().unwrap_or("unknown");
        let entities = if context.known_entities.is_empty() {
            "none".to_string()
        } else {
            context.known_entities.join(", ")
        };

        format!(
            r#"You are a research planning agent. Decompose the objective below into concrete research steps.

Current date: {date}
Organization: {organization}
Known entities: {entities}

Objective: {objective}

Return ONLY a JSON object of this shape:
{{
  "objective": "<restated objective>",
  "steps": [
    {{
      "id": "step-1",
      "type": "initial-scan",
      "query": "<concrete search query, time-scoped where useful>",
      "priority": "high",
      "dependencies": []
    }}
  ],
  "canParallelize": true
}}

Valid step types: initial-scan, deep-dive, competitor-analysis, validation, synthesis.
Valid priorities: high, medium, low.
"dependencies" lists ids of steps that must run first; the graph must be acyclic."#,
            date = context.current_date.format("%Y-%m-%d"),
            organization = organization,
            entities = entities,
            objective = objective,
        )
    }
}
