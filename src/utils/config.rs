//! Engine configuration.
//!
//! Defaults are safe for production use; every field can be overridden from
//! the environment (`QUESTOR_*` variables) or set directly by the embedding
//! application.

use crate::types::{EngineError, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Tunables for one orchestration run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cap on concurrent tool calls within a level. This is the only shared
    /// resource across concurrent step executions.
    pub max_concurrency: usize,
    /// Per-tool-call time bound. Exceeding it fails the step, not the run.
    pub step_timeout_ms: u64,
    /// Maximum self-query iterations per run.
    pub max_self_queries: usize,
    /// Wall-clock budget for the self-query loop.
    pub self_query_budget_ms: u64,
    /// Maximum insight snippets extracted per step.
    pub max_insights_per_step: usize,
    /// Character cap per extracted insight snippet.
    pub insight_char_budget: usize,
    /// Character cap on the findings serialization sent to gap detection.
    pub findings_char_budget: usize,
    /// Total attempts per tool call (1 = no retry). Only transient failures
    /// are re-attempted.
    pub retry_attempts: u32,
    /// Fixed delay between retry attempts.
    pub retry_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 5,
            step_timeout_ms: 30_000,
            max_self_queries: 5,
            self_query_budget_ms: 120_000,
            max_insights_per_step: 3,
            insight_char_budget: 280,
            findings_char_budget: 4_000,
            retry_attempts: 2,
            retry_delay_ms: 500,
        }
    }
}

impl EngineConfig {
    /// Build a config from the environment, falling back to defaults for
    /// anything unset. Reads a `.env` file when present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Ok(Self {
            max_concurrency: parse_var("QUESTOR_MAX_CONCURRENCY", defaults.max_concurrency)?,
            step_timeout_ms: parse_var("QUESTOR_STEP_TIMEOUT_MS", defaults.step_timeout_ms)?,
            max_self_queries: parse_var("QUESTOR_MAX_SELF_QUERIES", defaults.max_self_queries)?,
            self_query_budget_ms: parse_var(
                "QUESTOR_SELF_QUERY_BUDGET_MS",
                defaults.self_query_budget_ms,
            )?,
            max_insights_per_step: parse_var(
                "QUESTOR_MAX_INSIGHTS_PER_STEP",
                defaults.max_insights_per_step,
            )?,
            insight_char_budget: parse_var(
                "QUESTOR_INSIGHT_CHAR_BUDGET",
                defaults.insight_char_budget,
            )?,
            findings_char_budget: parse_var(
                "QUESTOR_FINDINGS_CHAR_BUDGET",
                defaults.findings_char_budget,
            )?,
            retry_attempts: parse_var("QUESTOR_RETRY_ATTEMPTS", defaults.retry_attempts)?,
            retry_delay_ms: parse_var("QUESTOR_RETRY_DELAY_MS", defaults.retry_delay_ms)?,
        })
    }

    /// Per-call timeout as a [`Duration`].
    pub fn step_timeout(&self) -> Duration {
        Duration::from_millis(self.step_timeout_ms)
    }

    /// Self-query wall-clock budget as a [`Duration`].
    pub fn self_query_budget(&self) -> Duration {
        Duration::from_millis(self.self_query_budget_ms)
    }

    /// Fixed retry delay as a [`Duration`].
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| EngineError::InvalidInput(format!("{name} has invalid value '{raw}'"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_concurrency, 5);
        assert_eq!(config.step_timeout(), Duration::from_secs(30));
        assert_eq!(config.max_self_queries, 5);
        assert_eq!(config.max_insights_per_step, 3);
        assert_eq!(config.retry_attempts, 2);
    }

    #[test]
    fn test_deserializes_partial_overrides() {
        let config: EngineConfig = serde_json::from_str(r#"{"max_concurrency": 2}"#).unwrap();
        assert_eq!(config.max_concurrency, 2);
        // serde(default) fills the rest.
        assert_eq!(config.retry_attempts, 2);
        assert_eq!(config.step_timeout_ms, 30_000);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("QUESTOR_TEST_BAD_VALUE", "not-a-number");
        let result: Result<usize> = parse_var("QUESTOR_TEST_BAD_VALUE", 1);
        env::remove_var("QUESTOR_TEST_BAD_VALUE");
        assert!(result.is_err());
    }
}
