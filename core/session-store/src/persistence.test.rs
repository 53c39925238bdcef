use relay_protocol::Session;

use super::*;

fn sample_session() -> Session {
    Session::new("sess-1", "anthropic", "claude-sonnet", "default", Vec::new(), 0)
}

#[tokio::test]
async fn null_persistence_never_returns_a_saved_session() {
    let persistence = NullPersistence;
    let snapshot = PersistedSession::new(sample_session(), Vec::new());
    persistence.save(&snapshot).await.unwrap();
    assert!(persistence.load("sess-1").await.unwrap().is_none());
    assert!(persistence.list_ids().await.unwrap().is_empty());
}

#[tokio::test]
async fn json_file_persistence_round_trips_through_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let persistence = JsonFilePersistence::new(dir.path());
    let snapshot = PersistedSession::new(sample_session(), Vec::new());
    persistence.save(&snapshot).await.unwrap();

    let loaded = persistence.load("sess-1").await.unwrap().expect("session present");
    assert_eq!(loaded.session.id, "sess-1");
    assert_eq!(loaded.version, 1);

    let ids = persistence.list_ids().await.unwrap();
    assert_eq!(ids, vec!["sess-1".to_string()]);
}

#[tokio::test]
async fn json_file_persistence_load_of_missing_session_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let persistence = JsonFilePersistence::new(dir.path());
    assert!(persistence.load("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn json_file_persistence_delete_removes_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let persistence = JsonFilePersistence::new(dir.path());
    let snapshot = PersistedSession::new(sample_session(), Vec::new());
    persistence.save(&snapshot).await.unwrap();
    persistence.delete("sess-1").await.unwrap();
    assert!(persistence.load("sess-1").await.unwrap().is_none());
}
