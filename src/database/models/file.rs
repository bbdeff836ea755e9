use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::policy::ResourceDescriptor;

/// Metadata row for an uploaded file. The payload lives in the object store
/// under `file_path`; `file_name` is the name the uploader chose.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkspaceFile {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub size_bytes: i64,
    pub content_type: String,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl WorkspaceFile {
    pub fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor::file(self.id, self.workspace_id, self.uploaded_by)
    }
}

#[derive(Debug, Clone)]
pub struct NewFile {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub size_bytes: i64,
    pub content_type: String,
    pub uploaded_by: Uuid,
}
