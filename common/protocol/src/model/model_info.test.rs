use super::*;

fn sample() -> ModelInfo {
    ModelInfo {
        id: "anthropic/claude-opus-4".to_string(),
        provider_id: "anthropic".to_string(),
        provider_type: ProviderType::Anthropic,
        display_name: "Claude Opus 4".to_string(),
        family: "claude-opus".to_string(),
        speed_rank: 2,
        input_capabilities: CapabilitySet {
            text: true,
            file: true,
            ..Default::default()
        },
        output_capabilities: CapabilitySet {
            text: true,
            tools: true,
            ..Default::default()
        },
        max_context: 200_000,
        pricing: Some(Pricing {
            input_per_million: 15.0,
            output_per_million: 75.0,
        }),
        reasoning: ReasoningSupport::Auto,
        supported_efforts: vec![ReasoningEffort::Low, ReasoningEffort::Medium, ReasoningEffort::High],
        status: ModelStatus::Active,
        options: HashMap::new(),
    }
}

#[test]
fn family_id_defaults_to_own_id_when_unset() {
    let mut model = sample();
    model.family = String::new();
    assert_eq!(model.family_id(), model.id);
}

#[test]
fn nearest_supported_effort_uses_own_list() {
    let model = sample();
    assert_eq!(model.nearest_supported_effort(ReasoningEffort::XHigh), ReasoningEffort::High);
}

#[test]
fn supports_input_and_output_queries() {
    let model = sample();
    assert!(model.supports_input(Capability::Text));
    assert!(model.supports_input(Capability::File));
    assert!(!model.supports_input(Capability::Image));
    assert!(model.supports_output(Capability::Tools));
    assert!(!model.supports_output(Capability::Audio));
}

#[test]
fn nearest_effort_falls_back_to_none_when_unsupported() {
    let mut model = sample();
    model.reasoning = ReasoningSupport::No;
    let supported = vec![ReasoningEffort::Low, ReasoningEffort::High];
    assert_eq!(
        model.nearest_effort(ReasoningEffort::Medium, &supported),
        ReasoningEffort::None
    );
}

#[test]
fn nearest_effort_delegates_when_supported() {
    let model = sample();
    let supported = vec![ReasoningEffort::Low, ReasoningEffort::High];
    assert_eq!(
        model.nearest_effort(ReasoningEffort::Medium, &supported),
        ReasoningEffort::Low
    );
}

#[test]
fn serde_round_trip() {
    let model = sample();
    let json = serde_json::to_string(&model).expect("serialize");
    let parsed: ModelInfo = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(parsed, model);
}

#[test]
fn default_status_is_active() {
    assert_eq!(ModelStatus::default(), ModelStatus::Active);
}
