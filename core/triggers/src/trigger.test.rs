use super::*;

#[test]
fn context_usage_is_a_fraction() {
    let ctx = TriggerContext { current_tokens: 80, max_tokens: 100, cpu_percent: 0.0, memory_percent: 0.0 };
    assert_eq!(ctx.context_usage(), 0.8);
}

#[test]
fn context_usage_with_no_max_is_zero_not_nan() {
    let ctx = TriggerContext::default();
    assert_eq!(ctx.context_usage(), 0.0);
}

#[test]
fn empty_outcome_has_nothing_to_apply() {
    assert!(TriggerOutcome::default().is_empty());
}
