//! # Questor: Research Orchestration Engine
//!
//! Questor turns a single natural-language research objective into a
//! dependency-respecting plan of research steps, executes those steps with
//! bounded parallelism, aggregates findings, detects remaining information
//! gaps, and recursively schedules follow-up steps to close them.
//!
//! ## Overview
//!
//! The engine is deliberately narrow: it owns scheduling, execution, and
//! aggregation. Its collaborators stay outside the crate boundary:
//!
//! - the decomposition/gap-detection model behind
//!   [`CompletionClient`](llm::CompletionClient)
//! - the concrete research tools (search, competitor feeds, validation
//!   sources) behind [`ResearchTool`](tools::ResearchTool)
//!
//! A run lives inside one request lifecycle: created at the start, discarded
//! at the end, no cross-run state, no persistence.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use questor::{ResearchContext, ResearchCoordinator, ToolKind, ToolRegistry};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut registry = ToolRegistry::new();
//!     registry.register(ToolKind::PrimarySearch, Arc::new(my_search_tool));
//!     registry.register(ToolKind::CompetitorScan, Arc::new(my_feed_tool));
//!
//!     let coordinator = ResearchCoordinator::new(my_client, Arc::new(registry));
//!     let result = coordinator
//!         .research("How did our competitors price in 2026?",
//!                   &ResearchContext::default())
//!         .await?;
//!
//!     println!("{} findings", result.key_findings.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`research`] - Decomposition, scheduling, execution, gap loop
//! - [`tools`] - Tool trait and capability registry
//! - [`llm`] - Completion-service seam
//! - [`types`] - Data model and error handling
//! - [`utils`] - Configuration and structured-output parsing

#![warn(missing_docs)]

/// External completion-service seam.
pub mod llm;
/// Plan decomposition, scheduling, execution, and the gap loop.
pub mod research;
/// Research tool trait and registry.
pub mod tools;
/// Core types (plans, steps, gaps, errors).
pub mod types;
/// Configuration and parsing utilities.
pub mod utils;

// Re-export commonly used types
pub use llm::CompletionClient;
pub use research::{
    DependencyScheduler, GapDetector, PlanDecomposer, ResearchCoordinator, ResultAggregator,
    SelfQueryQueue, StepExecutor,
};
pub use tools::{ResearchTool, ToolKind, ToolRegistry};
pub use types::{
    AggregatedResult, EngineError, GapPriority, InformationGap, RawResult, ResearchContext,
    ResearchPlan, ResearchStep, Result, StepPriority, StepStatus, StepType,
};
pub use utils::{parse_structured, EngineConfig, ParseError};
