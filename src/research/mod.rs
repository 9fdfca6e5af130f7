//! Research Orchestration
//!
//! This module turns a single natural-language objective into a
//! dependency-respecting plan of research steps, executes the plan with
//! bounded parallelism, aggregates findings, and recursively closes
//! remaining information gaps.
//!
//! # Architecture
//!
//! The pipeline is a fixed chain of components, leaves first:
//!
//! - [`decomposer::PlanDecomposer`]: objective to
//!   [`ResearchPlan`](crate::types::ResearchPlan), with a deterministic
//!   single-step fallback
//! - [`scheduler::DependencyScheduler`]: topological leveling and
//!   level-ordered execution with capped fan-out
//! - [`executor::StepExecutor`]: per-step tool dispatch, timeout, retry,
//!   and insight extraction
//! - [`gaps::GapDetector`]: objective plus findings to a prioritized gap list
//! - [`queue::SelfQueryQueue`]: bounded recursive follow-up loop
//! - [`aggregator::ResultAggregator`]: deduplicated findings and run stats
//! - [`coordinator::ResearchCoordinator`]: wires it all together per run
//!
//! # Usage
//!
//! ```ignore
//! use questor::{ResearchCoordinator, ResearchContext, ToolRegistry};
//! use std::sync::Arc;
//!
//! let coordinator = ResearchCoordinator::new(client, Arc::new(registry));
//! let result = coordinator
//!     .research("What changed in the vector database market this year?",
//!               &ResearchContext::default())
//!     .await?;
//!
//! for finding in &result.key_findings {
//!     println!("- {finding}");
//! }
//! ```
//!
//! # Error model
//!
//! A run degrades rather than aborts: decomposition and gap-detection
//! failures fall back to deterministic defaults, step failures are recorded
//! on the step, and budget exhaustion is a normal outcome. The single fatal
//! condition is a cyclic or unresolvable dependency graph in a
//! caller-supplied plan.

/// Findings merge and run statistics.
pub mod aggregator;
/// End-to-end run orchestration.
pub mod coordinator;
/// Objective decomposition with fallback.
pub mod decomposer;
/// Single-step execution against the tool registry.
pub mod executor;
/// Information-gap detection.
pub mod gaps;
/// Bounded self-query loop.
pub mod queue;
/// Topological leveling and level execution.
pub mod scheduler;

pub use aggregator::ResultAggregator;
pub use coordinator::ResearchCoordinator;
pub use decomposer::PlanDecomposer;
pub use executor::StepExecutor;
pub use gaps::GapDetector;
pub use queue::SelfQueryQueue;
pub use scheduler::DependencyScheduler;
