//! Pluggable durability for session snapshots.
//!
//! Grounded in the teacher's `app/session/src/persistence.rs`
//! (`save_session_to_file` / `load_session_from_file` / `PersistedSession`):
//! one JSON file per session, written atomically. Generalized here behind a
//! trait so the store can run purely in memory (tests) or against disk.

use async_trait::async_trait;
use relay_protocol::Message;
use relay_protocol::Session;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Result;
use crate::error::session_store_error::StorageFailedSnafu;

/// The durable snapshot of one session: its metadata plus every message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSession {
    pub version: u32,
    pub session: Session,
    pub messages: Vec<Message>,
}

impl PersistedSession {
    pub fn new(session: Session, messages: Vec<Message>) -> Self {
        Self {
            version: 1,
            session,
            messages,
        }
    }
}

#[async_trait]
pub trait SessionPersistence: Send + Sync {
    async fn save(&self, snapshot: &PersistedSession) -> Result<()>;
    async fn load(&self, session_id: &str) -> Result<Option<PersistedSession>>;
    async fn delete(&self, session_id: &str) -> Result<()>;
    async fn list_ids(&self) -> Result<Vec<String>>;
}

/// A no-op backend: sessions live only in the in-memory maps held by
/// [`crate::store::SessionStore`]. Used by tests and ephemeral sessions.
#[derive(Default)]
pub struct NullPersistence;

#[async_trait]
impl SessionPersistence for NullPersistence {
    async fn save(&self, _snapshot: &PersistedSession) -> Result<()> {
        Ok(())
    }

    async fn load(&self, _session_id: &str) -> Result<Option<PersistedSession>> {
        Ok(None)
    }

    async fn delete(&self, _session_id: &str) -> Result<()> {
        Ok(())
    }

    async fn list_ids(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Writes one JSON file per session under `base_dir`, atomically (temp file
/// + rename), mirroring `relay-config`'s loader.
pub struct JsonFilePersistence {
    base_dir: std::path::PathBuf,
}

impl JsonFilePersistence {
    pub fn new(base_dir: impl Into<std::path::PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    fn path(&self, session_id: &str) -> std::path::PathBuf {
        self.base_dir.join(format!("{session_id}.json"))
    }
}

#[async_trait]
impl SessionPersistence for JsonFilePersistence {
    async fn save(&self, snapshot: &PersistedSession) -> Result<()> {
        tokio::fs::create_dir_all(&self.base_dir).await.map_err(|err| {
            StorageFailedSnafu {
                message: format!("creating session store directory: {err}"),
            }
            .build()
        })?;
        let path = self.path(&snapshot.session.id);
        let tmp_path = self.base_dir.join(format!("{}.tmp", snapshot.session.id));
        let json = serde_json::to_string_pretty(snapshot).map_err(|err| {
            StorageFailedSnafu {
                message: format!("serializing session {}: {err}", snapshot.session.id),
            }
            .build()
        })?;
        let write = async {
            let mut file = tokio::fs::File::create(&tmp_path).await?;
            tokio::io::AsyncWriteExt::write_all(&mut file, json.as_bytes()).await?;
            file.sync_all().await?;
            tokio::fs::rename(&tmp_path, &path).await?;
            Ok::<_, std::io::Error>(())
        };
        write.await.map_err(|err| {
            StorageFailedSnafu {
                message: format!("writing session {}: {err}", snapshot.session.id),
            }
            .build()
        })
    }

    async fn load(&self, session_id: &str) -> Result<Option<PersistedSession>> {
        let path = self.path(session_id);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => serde_json::from_str(&contents).map(Some).map_err(|err| {
                StorageFailedSnafu {
                    message: format!("parsing session {session_id}: {err}"),
                }
                .build()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageFailedSnafu {
                message: format!("reading session {session_id}: {err}"),
            }
            .build()),
        }
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path(session_id)).await {
            Ok(()) | Err(_) => Ok(()),
        }
    }

    async fn list_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        let mut dir = match tokio::fs::read_dir(&self.base_dir).await {
            Ok(dir) => dir,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(ids),
            Err(err) => {
                return Err(StorageFailedSnafu {
                    message: format!("listing session store directory: {err}"),
                }
                .build());
            }
        };
        while let Ok(Some(entry)) = dir.next_entry().await {
            if let Some(stem) = entry.path().file_stem().and_then(|s| s.to_str()) {
                if entry.path().extension().and_then(|e| e.to_str()) == Some("json") {
                    ids.push(stem.to_string());
                }
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
#[path = "persistence.test.rs"]
mod tests;
