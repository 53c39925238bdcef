//! The rule contract evaluated before every turn (spec §4.9).

use std::collections::HashMap;

use async_trait::async_trait;
use relay_protocol::Session;

/// The live numbers a rule evaluates against, computed by the caller
/// (Streaming Engine) from the Context Assembler / `ContextBudget` and the
/// host process's own resource sampling.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriggerContext {
    pub current_tokens: u64,
    pub max_tokens: u64,
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

impl TriggerContext {
    /// `current_tokens / max_tokens`, or `0.0` if `max_tokens` is zero.
    pub fn context_usage(&self) -> f64 {
        if self.max_tokens == 0 {
            return 0.0;
        }
        self.current_tokens as f64 / self.max_tokens as f64
    }
}

/// One rule's result for this turn: a system message to insert, and/or a
/// flag patch to merge into the session (spec §4.9).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggerOutcome {
    pub system_message: Option<String>,
    pub flag_updates: HashMap<String, bool>,
}

impl TriggerOutcome {
    pub fn is_empty(&self) -> bool {
        self.system_message.is_none() && self.flag_updates.is_empty()
    }
}

/// A named, prioritized, enable-able rule (spec §4.9).
#[async_trait]
pub trait Trigger: Send + Sync {
    fn id(&self) -> &str;

    /// Rules are evaluated in descending priority order.
    fn priority(&self) -> i32;

    fn enabled(&self) -> bool {
        true
    }

    async fn evaluate(&self, session: &Session, ctx: &TriggerContext) -> Option<TriggerOutcome>;
}

#[cfg(test)]
#[path = "trigger.test.rs"]
mod tests;
