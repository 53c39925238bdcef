use std::sync::Arc;

use relay_error::ErrorExt;

use super::*;
use crate::passthrough::PassthroughProvider;

#[test]
fn register_then_get_round_trips() {
    let registry = ProviderRegistry::new();
    registry.register(Arc::new(PassthroughProvider));
    let found = registry.get("passthrough").unwrap();
    assert_eq!(found.id(), "passthrough");
}

#[test]
fn unknown_provider_is_an_error() {
    let registry = ProviderRegistry::new();
    let err = registry.get("nope").unwrap_err();
    assert_eq!(err.status_code(), relay_error::StatusCode::ProviderNotFound);
}

#[test]
fn list_ids_reflects_registrations() {
    let registry = ProviderRegistry::new();
    registry.register(Arc::new(PassthroughProvider));
    assert_eq!(registry.list_ids(), vec!["passthrough".to_string()]);
}
