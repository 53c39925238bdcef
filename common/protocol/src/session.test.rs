use super::*;

#[test]
fn new_session_starts_with_zero_tokens_and_no_title() {
    let session = Session::new("sess_1", "anthropic", "claude-opus-4", "default", vec![], 1000);
    assert_eq!(session.title, None);
    assert_eq!(session.base_context_tokens, 0);
    assert_eq!(session.total_tokens, 0);
    assert!(session.todos.is_empty());
    assert_eq!(session.next_todo_id, 0);
}

#[test]
fn flag_patch_merges_without_clearing_untouched_keys() {
    let mut session = Session::new("sess_1", "anthropic", "claude-opus-4", "default", vec![], 0);
    session.apply_flag_patch(HashMap::from([("contextWarning80".to_string(), true)]));
    session.apply_flag_patch(HashMap::from([("contextWarning90".to_string(), true)]));
    assert_eq!(session.flags.get("contextWarning80"), Some(&true));
    assert_eq!(session.flags.get("contextWarning90"), Some(&true));

    session.apply_flag_patch(HashMap::from([("contextWarning80".to_string(), false)]));
    assert_eq!(session.flags.get("contextWarning80"), Some(&false));
    assert_eq!(session.flags.get("contextWarning90"), Some(&true));
}

#[test]
fn is_compacted_reflects_metadata() {
    let mut session = Session::new("sess_1", "anthropic", "claude-opus-4", "default", vec![], 0);
    assert!(!session.is_compacted());
    session.metadata = Some(serde_json::json!({ "compactedTo": "sess_2" }));
    assert!(session.is_compacted());
}
