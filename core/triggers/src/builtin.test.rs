use relay_protocol::Session;

use super::*;

fn session() -> Session {
    Session::new("sess-1", "anthropic", "claude", "default", Vec::new(), 0)
}

#[tokio::test]
async fn context_usage_trigger_fires_once_at_threshold() {
    let trigger = ContextUsageTrigger::warning_80(100);
    let mut s = session();
    let ctx = TriggerContext { current_tokens: 80, max_tokens: 100, cpu_percent: 0.0, memory_percent: 0.0 };

    let outcome = trigger.evaluate(&s, &ctx).await.expect("should fire at exactly 80%");
    assert!(outcome.system_message.is_some());
    assert_eq!(outcome.flag_updates.get("contextWarning80"), Some(&true));
    s.apply_flag_patch(outcome.flag_updates);

    // Still at/above threshold: must not re-fire while the flag is set.
    assert!(trigger.evaluate(&s, &ctx).await.is_none());
}

#[tokio::test]
async fn context_usage_trigger_clears_on_drop_below_threshold() {
    let trigger = ContextUsageTrigger::warning_80(100);
    let mut s = session();
    s.flags.insert("contextWarning80".to_string(), true);

    let ctx = TriggerContext { current_tokens: 7999, max_tokens: 10000, cpu_percent: 0.0, memory_percent: 0.0 };
    let outcome = trigger.evaluate(&s, &ctx).await.expect("should clear just under 80%");
    assert_eq!(outcome.flag_updates.get("contextWarning80"), Some(&false));
    s.apply_flag_patch(outcome.flag_updates);

    assert!(trigger.evaluate(&s, &ctx).await.is_none());
}

#[tokio::test]
async fn resource_pressure_trigger_fires_on_cpu_or_memory() {
    let trigger = ResourcePressureTrigger::new(0.8, 10);
    let s = session();

    let hot_cpu = TriggerContext { current_tokens: 0, max_tokens: 1, cpu_percent: 0.9, memory_percent: 0.1 };
    assert!(trigger.evaluate(&s, &hot_cpu).await.is_some());

    let hot_mem = TriggerContext { current_tokens: 0, max_tokens: 1, cpu_percent: 0.1, memory_percent: 0.85 };
    assert!(trigger.evaluate(&s, &hot_mem).await.is_some());

    let calm = TriggerContext { current_tokens: 0, max_tokens: 1, cpu_percent: 0.1, memory_percent: 0.1 };
    assert!(trigger.evaluate(&s, &calm).await.is_none());
}

#[tokio::test]
async fn resource_pressure_trigger_clears_on_recovery() {
    let trigger = ResourcePressureTrigger::new(0.8, 10);
    let mut s = session();
    s.flags.insert("resourceWarning".to_string(), true);

    let calm = TriggerContext { current_tokens: 0, max_tokens: 1, cpu_percent: 0.2, memory_percent: 0.2 };
    let outcome = trigger.evaluate(&s, &calm).await.expect("should clear on recovery");
    assert_eq!(outcome.flag_updates.get("resourceWarning"), Some(&false));
    s.apply_flag_patch(outcome.flag_updates);

    assert!(trigger.evaluate(&s, &calm).await.is_none());
}
