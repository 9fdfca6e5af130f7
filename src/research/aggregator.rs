//! Result aggregation.
//!
//! Folds every terminal step, initial DAG run and self-query iterations
//! alike, into one [`AggregatedResult`]: a deduplicated findings set, a
//! results-by-step-id map, and per-run counters. Failed steps contribute no
//! insights but remain visible in `completed_steps` for caller-side
//! reporting.

use crate::types::{AggregatedResult, ResearchStep, StepStatus};
use std::collections::{HashMap, HashSet};

/// Merges per-step results into the final aggregate.
pub struct ResultAggregator;

impl ResultAggregator {
    /// Exact-duplicate-free insight list across `steps`, preserving first
    /// appearance order.
    pub fn key_findings(steps: &[ResearchStep]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut findings = Vec::new();
        for step in steps {
            for insight in &step.insights {
                if seen.insert(insight.as_str()) {
                    findings.push(insight.clone());
                }
            }
        }
        findings
    }

    /// Build the final aggregate over all terminal steps.
    pub fn aggregate(
        steps: Vec<ResearchStep>,
        self_query_iterations: usize,
        duration_ms: u64,
    ) -> AggregatedResult {
        let key_findings = Self::key_findings(&steps);

        let mut results_by_step_id = HashMap::new();
        let mut steps_completed = 0;
        let mut steps_failed = 0;

        for step in &steps {
            match step.status {
                StepStatus::Completed => steps_completed += 1,
                StepStatus::Failed => steps_failed += 1,
                _ => {}
            }
            if let Some(results) = &step.results {
                results_by_step_id.insert(step.id.clone(), results.clone());
            }
        }

        tracing::info!(
            steps = steps.len(),
            completed = steps_completed,
            failed = steps_failed,
            findings = key_findings.len(),
            self_query_iterations,
            duration_ms,
            "run aggregated"
        );

        AggregatedResult {
            completed_steps: steps,
            results_by_step_id,
            key_findings,
            steps_completed,
            steps_failed,
            self_query_iterations,
            duration_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StepType;
    use serde_json::json;

    fn step_with_insights(id: &str, status: StepStatus, insights: &[&str]) -> ResearchStep {
        let mut step = ResearchStep::new(id, StepType::DeepDive, "q");
        step.status = status;
        step.insights = insights.iter().map(|s| s.to_string()).collect();
        if status == StepStatus::Completed {
            step.results = Some(json!({"marker": id}));
        }
        step
    }

    #[test]
    fn test_exact_duplicates_collapse() {
        let steps = vec![
            step_with_insights("a", StepStatus::Completed, &["shared insight", "only a"]),
            step_with_insights("b", StepStatus::Completed, &["shared insight", "only b"]),
        ];

        let result = ResultAggregator::aggregate(steps, 0, 10);
        assert_eq!(
            result.key_findings,
            vec!["shared insight", "only a", "only b"]
        );
    }

    #[test]
    fn test_failed_steps_reported_without_findings() {
        let steps = vec![
            step_with_insights("ok", StepStatus::Completed, &["finding"]),
            step_with_insights("bad", StepStatus::Failed, &[]),
        ];

        let result = ResultAggregator::aggregate(steps, 0, 10);
        assert_eq!(result.completed_steps.len(), 2);
        assert_eq!(result.steps_completed, 1);
        assert_eq!(result.steps_failed, 1);
        assert_eq!(result.key_findings, vec!["finding"]);
        assert!(result.results_by_step_id.contains_key("ok"));
        assert!(!result.results_by_step_id.contains_key("bad"));
    }

    #[test]
    fn test_results_keyed_by_step_id() {
        let steps = vec![
            step_with_insights("a", StepStatus::Completed, &[]),
            step_with_insights("b", StepStatus::Completed, &[]),
        ];

        let result = ResultAggregator::aggregate(steps, 2, 99);
        assert_eq!(result.results_by_step_id["a"]["marker"], "a");
        assert_eq!(result.results_by_step_id["b"]["marker"], "b");
        assert_eq!(result.self_query_iterations, 2);
        assert_eq!(result.duration_ms, 99);
    }
}
