use crate::types::{EngineError, RawResult, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A single async research capability.
///
/// Implementations must be idempotent read operations: the engine applies a
/// fire-and-timeout policy and may retry transient failures, so a second
/// invocation with the same query has to be safe.
#[async_trait]
pub trait ResearchTool: Send + Sync {
    /// Stable tool name, for logging and error reporting.
    fn name(&self) -> &str;

    /// Run one query and return whatever fields the tool can populate.
    async fn run(&self, query: &str) -> Result<RawResult>;
}

/// Closed set of capabilities a registry can provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    /// Main full-text search tool.
    PrimarySearch,
    /// Fallback search tool, used when the primary is unavailable.
    SecondarySearch,
    /// Competitor/landscape scan tool.
    CompetitorScan,
    /// Independent second source for validation steps.
    Validator,
}

impl fmt::Debug for dyn ResearchTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResearchTool")
            .field("name", &self.name())
            .finish()
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ToolKind::PrimarySearch => "primary-search",
            ToolKind::SecondarySearch => "secondary-search",
            ToolKind::CompetitorScan => "competitor-scan",
            ToolKind::Validator => "validator",
        };
        f.write_str(name)
    }
}

/// Capability-keyed registry of research tools.
///
/// Supplied fully built by the caller; the engine never mutates it during a
/// run.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<ToolKind, Arc<dyn ResearchTool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool for a capability, replacing any previous one.
    pub fn register(&mut self, kind: ToolKind, tool: Arc<dyn ResearchTool>) {
        self.tools.insert(kind, tool);
    }

    /// Look up the tool for a capability.
    pub fn get(&self, kind: ToolKind) -> Option<Arc<dyn ResearchTool>> {
        self.tools.get(&kind).cloned()
    }

    /// Look up a required capability, erroring when absent.
    pub fn require(&self, kind: ToolKind) -> Result<Arc<dyn ResearchTool>> {
        self.get(kind)
            .ok_or_else(|| EngineError::MissingTool(kind.to_string()))
    }

    /// Check whether a capability is registered.
    pub fn has(&self, kind: ToolKind) -> bool {
        self.tools.contains_key(&kind)
    }

    /// Names of all registered tools.
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.values().map(|t| t.name().to_string()).collect()
    }
}
