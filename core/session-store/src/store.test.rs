use std::sync::Arc;

use relay_error::ErrorExt;
use relay_protocol::MessageRole;
use relay_protocol::MessageStatus;
use relay_protocol::Part;
use relay_protocol::PartStatus;
use relay_protocol::Todo;
use relay_protocol::TodoStatus;

use super::*;
use crate::persistence::NullPersistence;

fn store() -> SessionStore {
    SessionStore::new(Arc::new(NullPersistence))
}

#[tokio::test]
async fn create_session_assigns_fresh_metadata() {
    let store = store();
    let session = store
        .create_session("anthropic", "claude-sonnet", "default", vec!["rule-1".to_string()], 1000)
        .await
        .unwrap();
    assert_eq!(session.provider_id, "anthropic");
    assert_eq!(session.created_at, 1000);
    assert_eq!(store.get_session_count().await, 1);
    assert_eq!(store.get_last_session().await.unwrap().id, session.id);
}

#[tokio::test]
async fn get_session_by_id_returns_none_for_unknown_id() {
    let store = store();
    assert!(store.get_session_by_id("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn delete_session_removes_session_and_its_messages() {
    let store = store();
    let session = store.create_session("anthropic", "claude-sonnet", "default", vec![], 0).await.unwrap();
    store.add_message(&session.id, MessageRole::User, Vec::new(), None, None, 1).await.unwrap();

    store.delete_session(&session.id).await.unwrap();

    assert!(store.get_session_by_id(&session.id).await.unwrap().is_none());
    assert!(matches!(store.delete_session(&session.id).await, Err(_)));
}

#[tokio::test]
async fn add_message_starts_user_messages_completed_and_assistant_messages_active() {
    let store = store();
    let session = store.create_session("anthropic", "claude-sonnet", "default", vec![], 0).await.unwrap();

    let user_id = store.add_message(&session.id, MessageRole::User, Vec::new(), None, None, 1).await.unwrap();
    let assistant_id = store.add_message(&session.id, MessageRole::Assistant, Vec::new(), None, None, 2).await.unwrap();

    let (_, messages) = store.get_session_by_id(&session.id).await.unwrap().unwrap();
    let user = messages.iter().find(|m| m.id == user_id).unwrap();
    let assistant = messages.iter().find(|m| m.id == assistant_id).unwrap();
    assert_eq!(user.status, MessageStatus::Completed);
    assert_eq!(assistant.status, MessageStatus::Active);
}

#[tokio::test]
async fn append_step_rejects_out_of_order_index() {
    let store = store();
    let session = store.create_session("anthropic", "claude-sonnet", "default", vec![], 0).await.unwrap();
    let message_id = store.add_message(&session.id, MessageRole::Assistant, Vec::new(), None, None, 1).await.unwrap();

    assert!(store.append_step(&message_id, 1, Vec::new()).await.is_err());
    store.append_step(&message_id, 0, Vec::new()).await.unwrap();
    assert!(store.append_step(&message_id, 0, Vec::new()).await.is_err());
    store.append_step(&message_id, 1, Vec::new()).await.unwrap();
}

#[tokio::test]
async fn append_part_adds_to_an_existing_step() {
    let store = store();
    let session = store.create_session("anthropic", "claude-sonnet", "default", vec![], 0).await.unwrap();
    let message_id = store.add_message(&session.id, MessageRole::Assistant, Vec::new(), None, None, 1).await.unwrap();
    store.append_step(&message_id, 0, Vec::new()).await.unwrap();

    store
        .append_part(&message_id, 0, Part::Text { content: "hello".to_string(), status: PartStatus::Completed })
        .await
        .unwrap();

    let (_, messages) = store.get_session_by_id(&session.id).await.unwrap().unwrap();
    let message = messages.iter().find(|m| m.id == message_id).unwrap();
    assert_eq!(message.steps[0].parts.len(), 1);
}

#[tokio::test]
async fn update_tool_part_transitions_status_and_result_in_place() {
    let store = store();
    let session = store.create_session("anthropic", "claude-sonnet", "default", vec![], 0).await.unwrap();
    let message_id = store.add_message(&session.id, MessageRole::Assistant, Vec::new(), None, None, 1).await.unwrap();
    store.append_step(&message_id, 0, Vec::new()).await.unwrap();
    store
        .append_part(
            &message_id,
            0,
            Part::Tool {
                tool_id: "call-1".to_string(),
                name: "read_file".to_string(),
                input: serde_json::json!({"path": "a.rs"}),
                result: None,
                error: None,
                status: PartStatus::Active,
                start_time: 0,
                duration_ms: None,
            },
        )
        .await
        .unwrap();

    store
        .update_tool_part(&message_id, "call-1", PartStatus::Completed, Some(serde_json::json!({"contents": "fn main() {}"})), None, 12)
        .await
        .unwrap();

    let (_, messages) = store.get_session_by_id(&session.id).await.unwrap().unwrap();
    let message = messages.iter().find(|m| m.id == message_id).unwrap();
    let Part::Tool { tool_id, status, result, duration_ms, .. } = &message.steps[0].parts[0] else {
        panic!("expected a tool part");
    };
    assert_eq!(tool_id, "call-1");
    assert_eq!(*status, PartStatus::Completed);
    assert_eq!(result.as_ref().unwrap(), &serde_json::json!({"contents": "fn main() {}"}));
    assert_eq!(*duration_ms, Some(12));
}

#[tokio::test]
async fn update_tool_part_rejects_unknown_tool_call_id() {
    let store = store();
    let session = store.create_session("anthropic", "claude-sonnet", "default", vec![], 0).await.unwrap();
    let message_id = store.add_message(&session.id, MessageRole::Assistant, Vec::new(), None, None, 1).await.unwrap();
    store.append_step(&message_id, 0, Vec::new()).await.unwrap();

    let err = store.update_tool_part(&message_id, "missing", PartStatus::Completed, None, None, 0).await.expect_err("unknown tool call id must be rejected");
    assert_eq!(err.status_code(), relay_error::StatusCode::InvariantViolated);
}

#[tokio::test]
async fn update_message_status_rejects_non_monotone_transitions() {
    let store = store();
    let session = store.create_session("anthropic", "claude-sonnet", "default", vec![], 0).await.unwrap();
    let message_id = store.add_message(&session.id, MessageRole::Assistant, Vec::new(), None, None, 1).await.unwrap();

    store.update_message_status(&message_id, MessageStatus::Completed, None, None).await.unwrap();
    assert!(store.update_message_status(&message_id, MessageStatus::Error, None, None).await.is_err());
}

#[tokio::test]
async fn update_todos_rejects_a_regressing_next_todo_id() {
    let store = store();
    let session = store.create_session("anthropic", "claude-sonnet", "default", vec![], 0).await.unwrap();
    let todo = Todo { id: 0, content: "write tests".to_string(), active_form: "writing tests".to_string(), status: TodoStatus::Pending, ordering: 0 };

    store.update_todos(&session.id, vec![todo.clone()], 1).await.unwrap();
    assert!(store.update_todos(&session.id, vec![todo], 0).await.is_err());
}

#[tokio::test]
async fn store_and_get_file_content_round_trips() {
    let store = store();
    let id = store.store_file_content(vec![1, 2, 3], "image/png").await.unwrap();
    let content = store.get_file_content(&id).await.unwrap().unwrap();
    assert_eq!(content.size, 3);
    assert_eq!(content.media_type, "image/png");
    assert!(store.get_file_content("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn get_recent_sessions_metadata_orders_by_updated_then_created_descending() {
    let store = store();
    let first = store.create_session("anthropic", "claude-sonnet", "default", vec![], 100).await.unwrap();
    let second = store.create_session("anthropic", "claude-sonnet", "default", vec![], 200).await.unwrap();

    let page = store.get_recent_sessions_metadata(10, None).await.unwrap();
    assert_eq!(page.items[0].id, second.id);
    assert_eq!(page.items[1].id, first.id);
    assert!(page.next_cursor.is_none());
}

#[tokio::test]
async fn get_recent_sessions_metadata_paginates_with_a_cursor() {
    let store = store();
    for i in 0..3 {
        store.create_session("anthropic", "claude-sonnet", "default", vec![], i).await.unwrap();
    }

    let first_page = store.get_recent_sessions_metadata(2, None).await.unwrap();
    assert_eq!(first_page.items.len(), 2);
    assert!(first_page.next_cursor.is_some());

    let second_page = store
        .get_recent_sessions_metadata(2, first_page.next_cursor.as_deref())
        .await
        .unwrap();
    assert_eq!(second_page.items.len(), 1);
    assert!(second_page.next_cursor.is_none());
}

#[tokio::test]
async fn search_sessions_metadata_matches_title_substrings_case_insensitively() {
    let store = store();
    let session = store.create_session("anthropic", "claude-sonnet", "default", vec![], 0).await.unwrap();
    store.update_session_title(&session.id, Some("Refactor the Event Bus".to_string()), 1).await.unwrap();
    store.create_session("anthropic", "claude-sonnet", "default", vec![], 2).await.unwrap();

    let page = store.search_sessions_metadata("event bus", 10, None).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, session.id);
}

#[tokio::test]
async fn update_session_flags_merges_without_clobbering_existing_keys() {
    let store = store();
    let session = store.create_session("anthropic", "claude-sonnet", "default", vec![], 0).await.unwrap();

    let mut patch = std::collections::HashMap::new();
    patch.insert("compact_suggested".to_string(), true);
    store.update_session_flags(&session.id, patch, 1).await.unwrap();

    let mut patch2 = std::collections::HashMap::new();
    patch2.insert("resource_pressure".to_string(), true);
    let updated = store.update_session_flags(&session.id, patch2, 2).await.unwrap();

    assert_eq!(updated.flags.get("compact_suggested"), Some(&true));
    assert_eq!(updated.flags.get("resource_pressure"), Some(&true));
}

#[tokio::test]
async fn update_session_metadata_replaces_wholesale() {
    let store = store();
    let session = store.create_session("anthropic", "claude-sonnet", "default", vec![], 0).await.unwrap();

    let metadata = serde_json::json!({ "compactedTo": "new-session" });
    let updated = store.update_session_metadata(&session.id, Some(metadata.clone()), 1).await.unwrap();
    assert!(updated.is_compacted());
    assert_eq!(updated.metadata, Some(metadata));

    let cleared = store.update_session_metadata(&session.id, None, 2).await.unwrap();
    assert!(!cleared.is_compacted());
}
