//! Mock implementations for testing.
//!
//! This module provides mock completion clients and research tools that can
//! be used across different test files without duplication. None of them
//! touch the network.

use async_trait::async_trait;
use questor::types::{EngineError, RawResult, Result};
use questor::{CompletionClient, ResearchTool, ToolKind, ToolRegistry};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock completion client with a scripted response sequence.
///
/// Responses are consumed front to back; once the script is exhausted every
/// further call returns `"[]"`, which the gap detector reads as "no gaps",
/// the natural way to let a test run terminate.
pub struct MockCompletionClient {
    script: Mutex<VecDeque<String>>,
    should_fail: bool,
}

impl MockCompletionClient {
    /// Client that replays the given responses in order.
    pub fn scripted(responses: Vec<&str>) -> Self {
        Self {
            script: Mutex::new(responses.into_iter().map(String::from).collect()),
            should_fail: false,
        }
    }

    /// Client that always returns an error.
    pub fn failing() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            should_fail: true,
        }
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        if self.should_fail {
            return Err(EngineError::Completion("mock completion failure".to_string()));
        }
        let mut script = self.script.lock().unwrap();
        Ok(script.pop_front().unwrap_or_else(|| "[]".to_string()))
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Completion client that surfaces one fresh critical gap per call, forever.
/// Used to prove the self-query loop terminates on its budgets alone.
pub struct RelentlessGapClient {
    calls: AtomicU32,
}

impl RelentlessGapClient {
    pub fn new() -> Self {
        Self {
            calls: AtomicU32::new(0),
        }
    }
}

impl Default for RelentlessGapClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for RelentlessGapClient {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!(
            r#"[{{"topic": "gap-{n}", "rationale": "always more", "priority": "critical", "query": "follow-up {n}"}}]"#
        ))
    }

    fn model_name(&self) -> &str {
        "relentless-mock"
    }
}

/// Tool that answers every query with one derived insight and records the
/// order in which queries arrived.
pub struct RecordingTool {
    name: &'static str,
    pub calls: Arc<Mutex<Vec<String>>>,
    active: Arc<AtomicU32>,
    pub max_active: Arc<AtomicU32>,
    delay: Duration,
}

impl RecordingTool {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            calls: Arc::new(Mutex::new(Vec::new())),
            active: Arc::new(AtomicU32::new(0)),
            max_active: Arc::new(AtomicU32::new(0)),
            delay: Duration::ZERO,
        }
    }

    /// Add an artificial per-call delay so concurrency becomes observable.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_order(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResearchTool for RecordingTool {
    fn name(&self) -> &str {
        self.name
    }

    async fn run(&self, query: &str) -> Result<RawResult> {
        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now_active, Ordering::SeqCst);
        self.calls.lock().unwrap().push(query.to_string());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(RawResult {
            title: Some(query.to_string()),
            description: Some(format!("insight for {query}")),
            ..Default::default()
        })
    }
}

/// Tool that returns the same fixed description for every query.
pub struct FixedTool {
    name: &'static str,
    description: String,
}

impl FixedTool {
    pub fn new(name: &'static str, description: &str) -> Self {
        Self {
            name,
            description: description.to_string(),
        }
    }
}

#[async_trait]
impl ResearchTool for FixedTool {
    fn name(&self) -> &str {
        self.name
    }

    async fn run(&self, _query: &str) -> Result<RawResult> {
        Ok(RawResult {
            description: Some(self.description.clone()),
            ..Default::default()
        })
    }
}

/// Tool that always fails with a permanent error.
pub struct BrokenTool;

#[async_trait]
impl ResearchTool for BrokenTool {
    fn name(&self) -> &str {
        "broken"
    }

    async fn run(&self, _query: &str) -> Result<RawResult> {
        Err(EngineError::Tool {
            tool: "broken".to_string(),
            message: "simulated tool failure".to_string(),
            transient: false,
        })
    }
}

/// Registry with a recording primary search tool; returns the registry and
/// the tool handle for assertions.
pub fn registry_with_recording_search() -> (Arc<ToolRegistry>, Arc<RecordingTool>) {
    let tool = Arc::new(RecordingTool::new("mock-search"));
    let mut registry = ToolRegistry::new();
    registry.register(ToolKind::PrimarySearch, tool.clone());
    (Arc::new(registry), tool)
}
