use async_trait::async_trait;
use relay_protocol::Session;

use super::*;
use crate::trigger::TriggerOutcome;

struct FixedTrigger {
    id: &'static str,
    priority: i32,
    outcome: Option<TriggerOutcome>,
}

#[async_trait]
impl Trigger for FixedTrigger {
    fn id(&self) -> &str {
        self.id
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    async fn evaluate(&self, _session: &Session, _ctx: &TriggerContext) -> Option<TriggerOutcome> {
        self.outcome.clone()
    }
}

fn session() -> Session {
    Session::new("sess-1", "anthropic", "claude", "default", Vec::new(), 0)
}

fn outcome(message: &str, flag: &str, value: bool) -> Option<TriggerOutcome> {
    let mut flag_updates = HashMap::new();
    flag_updates.insert(flag.to_string(), value);
    Some(TriggerOutcome { system_message: Some(message.to_string()), flag_updates })
}

#[tokio::test]
async fn evaluates_in_descending_priority_order() {
    let mut layer = TriggerLayer::new();
    layer.register(Arc::new(FixedTrigger { id: "low", priority: 1, outcome: outcome("low", "a", true) }));
    layer.register(Arc::new(FixedTrigger { id: "high", priority: 10, outcome: outcome("high", "b", true) }));

    let result = layer.evaluate_all(&session(), &TriggerContext::default(), &[]).await;
    assert_eq!(result.system_messages, vec!["high".to_string(), "low".to_string()]);
}

#[tokio::test]
async fn higher_priority_wins_flag_conflicts() {
    let mut layer = TriggerLayer::new();
    layer.register(Arc::new(FixedTrigger { id: "low", priority: 1, outcome: outcome("low", "shared", false) }));
    layer.register(Arc::new(FixedTrigger { id: "high", priority: 10, outcome: outcome("high", "shared", true) }));

    let result = layer.evaluate_all(&session(), &TriggerContext::default(), &[]).await;
    assert_eq!(result.flag_updates.get("shared"), Some(&true));
}

#[tokio::test]
async fn none_outcomes_are_skipped() {
    let mut layer = TriggerLayer::new();
    layer.register(Arc::new(FixedTrigger { id: "silent", priority: 5, outcome: None }));

    let result = layer.evaluate_all(&session(), &TriggerContext::default(), &[]).await;
    assert!(result.system_messages.is_empty());
    assert!(result.flag_updates.is_empty());
}

#[tokio::test]
async fn enabled_rule_ids_filters_triggers() {
    let mut layer = TriggerLayer::new();
    layer.register(Arc::new(FixedTrigger { id: "a", priority: 1, outcome: outcome("a", "x", true) }));
    layer.register(Arc::new(FixedTrigger { id: "b", priority: 2, outcome: outcome("b", "y", true) }));

    let result = layer.evaluate_all(&session(), &TriggerContext::default(), &["b".to_string()]).await;
    assert_eq!(result.system_messages, vec!["b".to_string()]);
}
