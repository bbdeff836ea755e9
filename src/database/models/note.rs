use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::policy::ResourceDescriptor;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor::note(self.id, self.workspace_id, self.created_by)
    }
}

#[derive(Debug, Clone)]
pub struct NewNote {
    pub workspace_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_by: Uuid,
}
