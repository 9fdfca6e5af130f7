//! Top-level orchestration.
//!
//! The coordinator wires the whole pipeline together for one run:
//! decomposition, dependency-scheduled DAG execution, aggregation, gap
//! detection, and the bounded self-query loop. Each run owns its plan,
//! queue, and context; nothing is shared across runs.

use crate::llm::CompletionClient;
use crate::research::aggregator::ResultAggregator;
use crate::research::decomposer::PlanDecomposer;
use crate::research::executor::StepExecutor;
use crate::research::gaps::GapDetector;
use crate::research::queue::SelfQueryQueue;
use crate::research::scheduler::DependencyScheduler;
use crate::tools::ToolRegistry;
use crate::types::{AggregatedResult, ResearchContext, ResearchPlan, Result};
use crate::utils::EngineConfig;
use std::sync::Arc;
use std::time::Instant;

/// Orchestrates a full research run over a completion client and a tool
/// registry.
pub struct ResearchCoordinator {
    client: Arc<dyn CompletionClient>,
    registry: Arc<ToolRegistry>,
    config: EngineConfig,
}

impl ResearchCoordinator {
    /// Build a coordinator with default configuration.
    pub fn new(client: Arc<dyn CompletionClient>, registry: Arc<ToolRegistry>) -> Self {
        Self::with_config(client, registry, EngineConfig::default())
    }

    /// Build a coordinator with explicit configuration.
    pub fn with_config(
        client: Arc<dyn CompletionClient>,
        registry: Arc<ToolRegistry>,
        config: EngineConfig,
    ) -> Self {
        Self {
            client,
            registry,
            config,
        }
    }

    /// Execute a full orchestration run for a free-form objective.
    ///
    /// Decomposition degrades to the single-step fallback plan on any
    /// failure, so this cannot error on bad model output; the caller always
    /// receives a best-effort aggregate.
    pub async fn research(
        &self,
        objective: &str,
        context: &ResearchContext,
    ) -> Result<AggregatedResult> {
        let decomposer = PlanDecomposer::new(self.client.clone());
        let plan = decomposer.decompose(objective, context).await;
        self.run_plan(plan).await
    }

    /// Execute a pre-built plan.
    ///
    /// The only failure surfaced from a run is
    /// [`EngineError::InvalidPlan`](crate::types::EngineError::InvalidPlan)
    /// for a cyclic or unresolvable dependency graph; every other failure
    /// degrades into the returned aggregate (failed steps, empty gap lists).
    pub async fn run_plan(&self, plan: ResearchPlan) -> Result<AggregatedResult> {
        let started = Instant::now();
        let objective = plan.objective.clone();

        tracing::info!(
            objective = %objective,
            steps = plan.steps.len(),
            can_parallelize = plan.can_parallelize,
            "starting research run"
        );

        let executor = Arc::new(StepExecutor::new(self.registry.clone(), self.config.clone()));
        let scheduler = DependencyScheduler::new(executor.clone(), self.config.clone());

        let mut steps = scheduler.run(plan.steps, plan.can_parallelize).await?;
        let findings = ResultAggregator::key_findings(&steps);

        let detector = GapDetector::new(self.client.clone(), self.config.clone());
        let gaps = detector.detect(&objective, &findings).await;

        let mut queue = SelfQueryQueue::new(executor, detector, self.config.clone());
        for gap in gaps {
            queue.enqueue(gap);
        }

        let (follow_ups, iterations) = queue.drain(&objective, findings).await;
        steps.extend(follow_ups);

        Ok(ResultAggregator::aggregate(
            steps,
            iterations,
            started.elapsed().as_millis() as u64,
        ))
    }
}
