//! Scripted mock LLM for deterministic tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use lyra_core::{CoreError, Llm, Result};

/// A recorded call made against a [`MockLlm`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub system: String,
    pub user: String,
}

/// An [`Llm`] that replays a fixed script of responses.
///
/// Responses are returned in order; once the script is exhausted further
/// calls fail, which makes tests that issue an unexpected extra generation
/// call fail loudly instead of silently reusing canned text. Every call is
/// recorded for assertion.
#[derive(Default)]
pub struct MockLlm {
    script: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockLlm {
    /// Create a mock that replays `responses` in order.
    pub fn new(responses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            script: Mutex::new(responses.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Return all calls recorded so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall { system: system.to_string(), user: user.to_string() });
        }

        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        next.ok_or_else(|| CoreError::Model {
            model: "mock".into(),
            message: "mock script exhausted".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_script_in_order_then_fails() {
        let llm = MockLlm::new(["first", "second"]);

        assert_eq!(llm.generate("s", "u").await.unwrap(), "first");
        assert_eq!(llm.generate("s", "u").await.unwrap(), "second");
        assert!(llm.generate("s", "u").await.is_err());
        assert_eq!(llm.call_count(), 3);
    }
}
