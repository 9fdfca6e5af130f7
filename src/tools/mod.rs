//! Research tool infrastructure.
//!
//! Tools are the engine's only way of touching the outside world during step
//! execution: full-text search, competitor-feed scans, cross-validation
//! lookups. Their implementations (HTTP fetch, RSS parsing, scraping) belong
//! to the caller; the engine sees a uniform async `query -> RawResult`
//! convention behind the [`registry::ResearchTool`] trait.
//!
//! # Capabilities
//!
//! The registry is keyed by [`registry::ToolKind`], a closed capability set:
//!
//! - `PrimarySearch` / `SecondarySearch`: full-text search, with the
//!   secondary acting as fallback when the primary is unavailable
//! - `CompetitorScan`: competitor/landscape aggregation
//! - `Validator`: independent second source for validation steps
//!
//! Step types map onto capabilities through an exhaustive match in the
//! executor, so the set of valid routings is checked at compile time.

/// Tool trait, capability enum, and registry.
pub mod registry;

pub use registry::{ResearchTool, ToolKind, ToolRegistry};
