//! Built-in rules (spec §4.9): context-usage warnings at 80%/90%, and a
//! resource-pressure warning at 80% CPU or memory. Each is a
//! bidirectional edge trigger: it fires once on crossing the threshold
//! upward (setting its flag), stays silent while the flag is set, and
//! fires a clearing message once usage drops back below the threshold
//! (spec §4.9 "never re-fires while its entered flag is set").

use std::collections::HashMap;

use async_trait::async_trait;
use relay_protocol::Session;

use crate::trigger::Trigger;
use crate::trigger::TriggerContext;
use crate::trigger::TriggerOutcome;

fn flag(session: &Session, name: &str) -> bool {
    session.flags.get(name).copied().unwrap_or(false)
}

fn edge_outcome(entered_now: bool, was_entered: bool, flag_name: &str, enter_message: String, clear_message: String) -> Option<TriggerOutcome> {
    if entered_now && !was_entered {
        let mut flag_updates = HashMap::new();
        flag_updates.insert(flag_name.to_string(), true);
        return Some(TriggerOutcome { system_message: Some(enter_message), flag_updates });
    }
    if !entered_now && was_entered {
        let mut flag_updates = HashMap::new();
        flag_updates.insert(flag_name.to_string(), false);
        return Some(TriggerOutcome { system_message: Some(clear_message), flag_updates });
    }
    None
}

/// Warns once context usage crosses `threshold` (0.0-1.0); clears on the
/// way back down. `flag_name` is e.g. `"contextWarning80"`.
pub struct ContextUsageTrigger {
    id: String,
    flag_name: String,
    threshold: f64,
    priority: i32,
}

impl ContextUsageTrigger {
    pub fn new(id: impl Into<String>, flag_name: impl Into<String>, threshold: f64, priority: i32) -> Self {
        Self { id: id.into(), flag_name: flag_name.into(), threshold, priority }
    }

    pub fn warning_80(priority: i32) -> Self {
        Self::new("context-usage-80", "contextWarning80", 0.80, priority)
    }

    pub fn warning_90(priority: i32) -> Self {
        Self::new("context-usage-90", "contextWarning90", 0.90, priority)
    }
}

#[async_trait]
impl Trigger for ContextUsageTrigger {
    fn id(&self) -> &str {
        &self.id
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    async fn evaluate(&self, session: &Session, ctx: &TriggerContext) -> Option<TriggerOutcome> {
        let usage = ctx.context_usage();
        let was_entered = flag(session, &self.flag_name);
        let entered_now = usage >= self.threshold;
        edge_outcome(
            entered_now,
            was_entered,
            &self.flag_name,
            format!(
                "Context usage is at {:.0}% of the model's context window ({} / {} tokens). Consider compacting the conversation soon.",
                usage * 100.0,
                ctx.current_tokens,
                ctx.max_tokens
            ),
            format!("Context usage has dropped back below {:.0}%.", self.threshold * 100.0),
        )
    }
}

/// Warns once CPU or memory usage crosses 80%; clears on recovery.
pub struct ResourcePressureTrigger {
    threshold: f64,
    priority: i32,
}

impl ResourcePressureTrigger {
    pub fn new(threshold: f64, priority: i32) -> Self {
        Self { threshold, priority }
    }
}

const RESOURCE_WARNING_FLAG: &str = "resourceWarning";

#[async_trait]
impl Trigger for ResourcePressureTrigger {
    fn id(&self) -> &str {
        "resource-pressure"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    async fn evaluate(&self, session: &Session, ctx: &TriggerContext) -> Option<TriggerOutcome> {
        let was_entered = flag(session, RESOURCE_WARNING_FLAG);
        let entered_now = ctx.cpu_percent >= self.threshold || ctx.memory_percent >= self.threshold;
        edge_outcome(
            entered_now,
            was_entered,
            RESOURCE_WARNING_FLAG,
            format!(
                "System resources are under pressure (cpu {:.0}%, memory {:.0}%). Tool execution may be slower than usual.",
                ctx.cpu_percent * 100.0,
                ctx.memory_percent * 100.0
            ),
            "System resource pressure has recovered.".to_string(),
        )
    }
}

#[cfg(test)]
#[path = "builtin.test.rs"]
mod tests;
