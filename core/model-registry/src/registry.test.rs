use relay_protocol::CapabilitySet;
use relay_protocol::ModelStatus;
use relay_protocol::ReasoningEffort;
use relay_protocol::ReasoningSupport;

use super::*;

fn sample_model(id: &str, provider_id: &str) -> ModelInfo {
    ModelInfo {
        id: id.to_string(),
        provider_id: provider_id.to_string(),
        provider_type: ProviderType::Anthropic,
        display_name: id.to_string(),
        family: String::new(),
        speed_rank: 0,
        input_capabilities: CapabilitySet { text: true, ..Default::default() },
        output_capabilities: CapabilitySet { text: true, tools: true, ..Default::default() },
        max_context: 200_000,
        pricing: None,
        reasoning: ReasoningSupport::Yes,
        supported_efforts: vec![ReasoningEffort::Low, ReasoningEffort::Medium, ReasoningEffort::High],
        status: ModelStatus::Active,
        options: HashMap::new(),
    }
}

fn registry() -> ModelRegistry {
    let providers = vec![ProviderEntry { id: "anthropic".to_string(), name: "Anthropic".to_string(), provider_type: ProviderType::Anthropic }];
    let mut sonnet = sample_model("anthropic/claude-sonnet", "anthropic");
    sonnet.family = "claude".to_string();
    sonnet.speed_rank = 1;
    let mut haiku = sample_model("anthropic/claude-haiku", "anthropic");
    haiku.family = "claude".to_string();
    haiku.speed_rank = 0;
    let models = vec![sonnet, haiku];
    ModelRegistry::new(providers, models)
}

#[test]
fn get_model_returns_not_found_for_unknown_id() {
    let registry = registry();
    assert!(registry.get_model("missing").is_err());
}

#[test]
fn get_models_by_provider_filters_correctly() {
    let registry = registry();
    let models = registry.get_models_by_provider("anthropic");
    assert_eq!(models.len(), 2);
}

#[test]
fn model_supports_input_and_output_reflect_capability_sets() {
    let registry = registry();
    assert!(registry.model_supports_input("anthropic/claude-sonnet", Capability::Text).unwrap());
    assert!(!registry.model_supports_input("anthropic/claude-sonnet", Capability::Image).unwrap());
    assert!(registry.model_supports_output("anthropic/claude-sonnet", Capability::Tools).unwrap());
}

#[tokio::test]
async fn dynamic_capabilities_caches_the_fetch_result() {
    let registry = registry();
    let key = CapabilityCacheKey::new("anthropic", "sk-abcdef1234");
    let calls = std::sync::atomic::AtomicUsize::new(0);

    let fetch = || async {
        calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok::<_, std::convert::Infallible>(serde_json::json!({ "supported_parameters": ["tools"] }))
    };

    let first = registry.dynamic_capabilities(&key, fetch).await.unwrap();
    let second = registry.dynamic_capabilities(&key, fetch).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[test]
fn upsert_model_replaces_an_existing_catalog_entry() {
    let mut registry = registry();
    let mut updated = sample_model("anthropic/claude-sonnet", "anthropic");
    updated.status = ModelStatus::Deprecated;
    registry.upsert_model(updated);
    assert_eq!(registry.get_model("anthropic/claude-sonnet").unwrap().status, ModelStatus::Deprecated);
}

#[test]
fn fastest_in_family_picks_the_lowest_speed_rank() {
    let registry = registry();
    let fastest = registry.fastest_in_family("anthropic", "claude").unwrap();
    assert_eq!(fastest.id, "anthropic/claude-haiku");
}

#[test]
fn fastest_in_family_errs_on_unknown_family() {
    let registry = registry();
    assert!(registry.fastest_in_family("anthropic", "gpt").is_err());
}

#[test]
fn nearest_effort_for_model_delegates_to_the_models_own_list() {
    let registry = registry();
    assert_eq!(registry.nearest_effort_for_model("anthropic/claude-sonnet", ReasoningEffort::XHigh).unwrap(), ReasoningEffort::High);
}
