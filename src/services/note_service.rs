use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::{require, required, ServiceError, ServiceResult};
use crate::database::models::{NewNote, Note};
use crate::database::WorkspaceStore;
use crate::policy::{can_manage, Action, ResourceDescriptor};
use crate::types::ResourceKind;

const TITLE_REQUIRED: &str = "Note title is required";
const CONTENT_REQUIRED: &str = "Note content is required";

/// A note plus whether the viewer may edit or delete it.
#[derive(Debug, Clone, Serialize)]
pub struct NoteView {
    #[serde(flatten)]
    pub note: Note,
    pub can_manage: bool,
}

pub struct NoteService {
    store: Arc<dyn WorkspaceStore>,
}

impl NoteService {
    pub fn new(store: Arc<dyn WorkspaceStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, actor: Uuid, workspace_id: Uuid) -> ServiceResult<Vec<NoteView>> {
        let role = require(self.store.as_ref(), actor, workspace_id, Action::ViewWorkspace).await?;

        let notes = self.store.list_notes(workspace_id).await?;
        Ok(notes
            .into_iter()
            .map(|note| NoteView {
                can_manage: can_manage(actor, role, &note.descriptor()),
                note,
            })
            .collect())
    }

    pub async fn create(
        &self,
        actor: Uuid,
        workspace_id: Uuid,
        title: &str,
        content: &str,
    ) -> ServiceResult<Note> {
        let title = required(title, TITLE_REQUIRED)?;
        let content = required(content, CONTENT_REQUIRED)?;

        require(self.store.as_ref(), actor, workspace_id, Action::CreateNote).await?;

        let note = self
            .store
            .create_note(NewNote {
                workspace_id,
                title,
                content,
                created_by: actor,
            })
            .await?;

        info!(note_id = %note.id, workspace_id = %workspace_id, "note created");
        Ok(note)
    }

    pub async fn update(
        &self,
        actor: Uuid,
        workspace_id: Uuid,
        note_id: Uuid,
        title: &str,
        content: &str,
    ) -> ServiceResult<Note> {
        let title = required(title, TITLE_REQUIRED)?;
        let content = required(content, CONTENT_REQUIRED)?;

        let resource = self.resource(actor, workspace_id, note_id).await?;
        require(self.store.as_ref(), actor, workspace_id, Action::EditNote(resource)).await?;

        let note = self
            .store
            .update_note(note_id, &title, &content)
            .await?
            .ok_or_else(|| ServiceError::not_found("Note not found"))?;

        info!(note_id = %note.id, workspace_id = %workspace_id, "note updated");
        Ok(note)
    }

    pub async fn delete(&self, actor: Uuid, workspace_id: Uuid, note_id: Uuid) -> ServiceResult<()> {
        let resource = self.resource(actor, workspace_id, note_id).await?;
        require(self.store.as_ref(), actor, workspace_id, Action::DeleteNote(resource)).await?;

        if !self.store.delete_note(note_id).await? {
            return Err(ServiceError::not_found("Note not found"));
        }

        info!(note_id = %note_id, workspace_id = %workspace_id, "note deleted");
        Ok(())
    }

    /// Descriptor of an existing note. A missing note is reported as not
    /// found only to members of the workspace.
    async fn resource(
        &self,
        actor: Uuid,
        workspace_id: Uuid,
        note_id: Uuid,
    ) -> ServiceResult<ResourceDescriptor> {
        match self.store.resource_by_id(ResourceKind::Note, note_id).await? {
            Some(resource) => Ok(resource),
            None => {
                require(self.store.as_ref(), actor, workspace_id, Action::ViewWorkspace).await?;
                Err(ServiceError::not_found("Note not found"))
            }
        }
    }
}
