//! Out-of-line file content referenced by `Part::FileRef` (spec §3).

use serde::Deserialize;
use serde::Serialize;

/// Content bytes for a file attachment, stored separately from the message
/// history so large payloads don't bloat every fetch of a session's messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileContent {
    pub id: String,
    pub content: Vec<u8>,
    pub media_type: String,
    pub size: u64,
}

impl FileContent {
    pub fn new(id: impl Into<String>, content: Vec<u8>, media_type: impl Into<String>) -> Self {
        let size = content.len() as u64;
        Self {
            id: id.into(),
            content,
            media_type: media_type.into(),
            size,
        }
    }
}

#[cfg(test)]
#[path = "file_content.test.rs"]
mod tests;
