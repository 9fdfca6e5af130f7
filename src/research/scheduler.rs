//! Dependency-aware step scheduling.
//!
//! Steps are grouped into topological levels: a level contains every
//! not-yet-leveled step whose dependencies have all been assigned to earlier
//! levels. Levels execute strictly in order; within a level, steps run
//! concurrently (capped by a semaphore) when the plan allows it.
//!
//! Dependency satisfaction is structural, not result-based: a failed
//! dependency still unblocks its dependents. Failure propagates through
//! absent results, not through scheduling refusal.

use crate::research::executor::StepExecutor;
use crate::types::{EngineError, ResearchStep, Result, StepStatus};
use crate::utils::EngineConfig;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Executes a plan's step DAG level by level.
pub struct DependencyScheduler {
    executor: Arc<StepExecutor>,
    config: EngineConfig,
}

impl DependencyScheduler {
    /// Build a scheduler that dispatches steps through `executor`.
    pub fn new(executor: Arc<StepExecutor>, config: EngineConfig) -> Self {
        Self { executor, config }
    }

    /// Compute topological levels over `steps`.
    ///
    /// Returned levels hold indices into `steps`, in declaration order, so
    /// iteration is deterministic. Errors with [`EngineError::InvalidPlan`]
    /// on duplicate ids, cycles, or dependencies on unknown step ids; the
    /// error lists the offending step ids and no execution is attempted.
    pub fn level(steps: &[ResearchStep]) -> Result<Vec<Vec<usize>>> {
        let mut ids = HashSet::new();
        let duplicates: Vec<String> = steps
            .iter()
            .filter(|s| !ids.insert(s.id.as_str()))
            .map(|s| s.id.clone())
            .collect();
        if !duplicates.is_empty() {
            return Err(EngineError::InvalidPlan {
                reason: "duplicate step ids".to_string(),
                step_ids: duplicates,
            });
        }

        let mut levels = Vec::new();
        let mut leveled = vec![false; steps.len()];
        let mut satisfied: HashSet<&str> = HashSet::new();

        while leveled.iter().any(|done| !done) {
            let current: Vec<usize> = steps
                .iter()
                .enumerate()
                .filter(|(i, step)| {
                    !leveled[*i]
                        && step
                            .dependencies
                            .iter()
                            .all(|dep| satisfied.contains(dep.as_str()))
                })
                .map(|(i, _)| i)
                .collect();

            if current.is_empty() {
                // Remaining steps form a cycle or depend on ids that do not
                // exist in this plan.
                let stuck: Vec<String> = steps
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !leveled[*i])
                    .map(|(_, s)| s.id.clone())
                    .collect();
                return Err(EngineError::InvalidPlan {
                    reason: "cyclic or unresolvable dependencies".to_string(),
                    step_ids: stuck,
                });
            }

            for &i in &current {
                leveled[i] = true;
                satisfied.insert(steps[i].id.as_str());
            }
            levels.push(current);
        }

        Ok(levels)
    }

    /// Execute all steps level by level and return them in declaration
    /// order, each in a terminal state.
    ///
    /// Level N+1 never starts before every step of level N is terminal.
    /// When `can_parallelize` is set, a multi-step level fans out through a
    /// [`JoinSet`] gated by a semaphore sized to the configured concurrency
    /// cap; otherwise steps run sequentially in declaration order.
    pub async fn run(
        &self,
        steps: Vec<ResearchStep>,
        can_parallelize: bool,
    ) -> Result<Vec<ResearchStep>> {
        let levels = Self::level(&steps)?;
        let mut slots: Vec<Option<ResearchStep>> = steps.into_iter().map(Some).collect();

        for (level_idx, level) in levels.iter().enumerate() {
            tracing::debug!(
                level = level_idx,
                steps = level.len(),
                parallel = can_parallelize && level.len() > 1,
                "executing level"
            );

            if can_parallelize && level.len() > 1 {
                self.run_level_parallel(level, &mut slots).await;
            } else {
                for &i in level {
                    if let Some(step) = slots[i].take() {
                        slots[i] = Some(self.executor.execute(step).await);
                    }
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }

    /// Fan a level out across tasks, re-slotting results by declaration
    /// index so output order is stable regardless of completion order.
    async fn run_level_parallel(&self, level: &[usize], slots: &mut [Option<ResearchStep>]) {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let mut set: JoinSet<(usize, ResearchStep)> = JoinSet::new();
        // Pristine copies so a panicked task still leaves a terminal step.
        let mut fallbacks: HashMap<usize, ResearchStep> = HashMap::new();

        for &i in level {
            let Some(step) = slots[i].take() else { continue };
            fallbacks.insert(i, step.clone());
            let executor = self.executor.clone();
            let semaphore = semaphore.clone();
            set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                (i, executor.execute(step).await)
            });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((i, step)) => {
                    fallbacks.remove(&i);
                    slots[i] = Some(step);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "step task aborted");
                }
            }
        }

        for (i, mut step) in fallbacks {
            step.status = StepStatus::Failed;
            slots[i] = Some(step);
        }
    }
}
