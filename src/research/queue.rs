//! Bounded self-query loop.
//!
//! Detected gaps become fresh follow-up steps executed straight through the
//! step executor; self-queries have no inter-dependencies by construction,
//! so the dependency scheduler is bypassed. After each executed trigger the
//! gap detector is re-invoked against the updated findings, and any newly
//! surfaced actionable gaps are enqueued.
//!
//! Termination is an explicit contract, not an emergent property: the loop
//! stops when the queue empties, the iteration cap is reached, or the
//! wall-clock budget is exhausted, whichever comes first. Budget exhaustion
//! with gaps remaining is a normal outcome, not an error.

use crate::research::executor::StepExecutor;
use crate::research::gaps::GapDetector;
use crate::types::{GapPriority, InformationGap, ResearchStep, StepPriority, StepType};
use crate::utils::EngineConfig;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// FIFO queue of follow-up triggers plus the run's shared topic context.
pub struct SelfQueryQueue {
    executor: Arc<StepExecutor>,
    detector: GapDetector,
    config: EngineConfig,
    queue: VecDeque<InformationGap>,
    /// Topic -> insights gathered for it. Doubles as the seen-set: a topic
    /// already researched is not re-enqueued.
    context: HashMap<String, Vec<String>>,
    iterations: usize,
}

impl SelfQueryQueue {
    /// Build an empty queue over the given executor and detector.
    pub fn new(executor: Arc<StepExecutor>, detector: GapDetector, config: EngineConfig) -> Self {
        Self {
            executor,
            detector,
            config,
            queue: VecDeque::new(),
            context: HashMap::new(),
            iterations: 0,
        }
    }

    /// Accept a gap as a pending trigger.
    ///
    /// Medium/low gaps are informational and are dropped; so are gaps whose
    /// topic was already researched or is already queued.
    pub fn enqueue(&mut self, gap: InformationGap) {
        if !gap.priority.is_actionable() {
            tracing::debug!(topic = %gap.topic, priority = ?gap.priority, "gap not actionable, skipping");
            return;
        }
        if self.context.contains_key(&gap.topic) || self.queue.iter().any(|g| g.topic == gap.topic)
        {
            tracing::debug!(topic = %gap.topic, "topic already covered, skipping");
            return;
        }
        tracing::info!(topic = %gap.topic, "enqueuing self-query");
        self.queue.push_back(gap);
    }

    /// Number of pending triggers.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no triggers are pending.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drain the queue within the iteration and wall-clock budgets.
    ///
    /// Returns the executed follow-up steps and the number of iterations
    /// consumed. `findings` seeds the detector context and grows with each
    /// executed trigger's insights.
    pub async fn drain(
        &mut self,
        objective: &str,
        mut findings: Vec<String>,
    ) -> (Vec<ResearchStep>, usize) {
        let started = Instant::now();
        let mut executed = Vec::new();

        loop {
            if self.iterations >= self.config.max_self_queries {
                tracing::info!(
                    iterations = self.iterations,
                    pending = self.queue.len(),
                    "self-query iteration budget exhausted"
                );
                break;
            }
            if started.elapsed() >= self.config.self_query_budget() {
                tracing::info!(
                    pending = self.queue.len(),
                    "self-query time budget exhausted"
                );
                break;
            }
            let Some(gap) = self.queue.pop_front() else {
                break;
            };

            self.iterations += 1;
            let step = self.step_for_gap(&gap);
            tracing::info!(
                step = %step.id,
                topic = %gap.topic,
                iteration = self.iterations,
                "executing self-query"
            );

            let step = self.executor.execute(step).await;
            self.context.insert(gap.topic.clone(), step.insights.clone());
            findings.extend(step.insights.iter().cloned());
            executed.push(step);

            // Re-check completeness against the grown findings set; anything
            // newly critical goes back on the queue.
            for gap in self.detector.detect(objective, &findings).await {
                self.enqueue(gap);
            }
        }

        (executed, self.iterations)
    }

    /// A gap becomes a fresh deep-dive step with a new id and no
    /// dependencies; the gap's provenance lives in the context map, not in
    /// the DAG.
    fn step_for_gap(&self, gap: &InformationGap) -> ResearchStep {
        let priority = match gap.priority {
            GapPriority::Critical | GapPriority::High => StepPriority::High,
            GapPriority::Medium | GapPriority::Low => StepPriority::Medium,
        };
        ResearchStep::new(
            format!("self-query-{}", Uuid::new_v4()),
            StepType::DeepDive,
            gap.query.clone(),
        )
        .with_priority(priority)
    }
}
