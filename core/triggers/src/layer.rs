//! Orchestrates the registered triggers for one turn (spec §4.9).

use std::collections::HashMap;
use std::sync::Arc;

use relay_protocol::Session;
use tracing::debug;

use crate::trigger::Trigger;
use crate::trigger::TriggerContext;

/// The merged result of evaluating every enabled trigger for a turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggerLayerResult {
    /// System messages to insert, in descending-priority order.
    pub system_messages: Vec<String>,
    /// The flag patch to merge into the session (`Session::apply_flag_patch`).
    pub flag_updates: HashMap<String, bool>,
}

/// Holds the registered triggers and evaluates them each turn.
///
/// Grounded in the teacher's `features/hooks::{registry,matcher,scope}`
/// merge-by-priority shape, generalized from hook-matching to the context-
/// usage / resource-pressure rules this spec describes.
#[derive(Default)]
pub struct TriggerLayer {
    triggers: Vec<Arc<dyn Trigger>>,
}

impl TriggerLayer {
    pub fn new() -> Self {
        Self { triggers: Vec::new() }
    }

    pub fn register(&mut self, trigger: Arc<dyn Trigger>) {
        self.triggers.push(trigger);
    }

    /// Enumerates enabled triggers in descending priority order, evaluates
    /// each against `session`/`ctx`, and merges the results. When two
    /// triggers' flag updates collide on the same key, the later
    /// (lower-priority) one loses — the first write for a key wins.
    pub async fn evaluate_all(&self, session: &Session, ctx: &TriggerContext, enabled_rule_ids: &[String]) -> TriggerLayerResult {
        let mut ordered: Vec<&Arc<dyn Trigger>> = self
            .triggers
            .iter()
            .filter(|t| t.enabled())
            .filter(|t| enabled_rule_ids.is_empty() || enabled_rule_ids.iter().any(|id| id == t.id()))
            .collect();
        ordered.sort_by(|a, b| b.priority().cmp(&a.priority()));

        let mut result = TriggerLayerResult::default();
        for trigger in ordered {
            let Some(outcome) = trigger.evaluate(session, ctx).await else {
                continue;
            };
            if outcome.is_empty() {
                continue;
            }
            if let Some(message) = outcome.system_message {
                result.system_messages.push(message);
            }
            for (key, value) in outcome.flag_updates {
                if let Some(existing) = result.flag_updates.get(&key) {
                    if *existing != value {
                        debug!(trigger_id = trigger.id(), flag = %key, "trigger flag conflict, keeping higher-priority value");
                    }
                    continue;
                }
                result.flag_updates.insert(key, value);
            }
        }
        result
    }
}

#[cfg(test)]
#[path = "layer.test.rs"]
mod tests;
