use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ResourceKind;

/// The slice of a note or file row the policy needs: where it lives and who
/// created it (`notes.created_by` / `files.uploaded_by`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub owner_user_id: Uuid,
}

impl ResourceDescriptor {
    pub fn note(id: Uuid, workspace_id: Uuid, created_by: Uuid) -> Self {
        Self {
            kind: ResourceKind::Note,
            id,
            workspace_id,
            owner_user_id: created_by,
        }
    }

    pub fn file(id: Uuid, workspace_id: Uuid, uploaded_by: Uuid) -> Self {
        Self {
            kind: ResourceKind::File,
            id,
            workspace_id,
            owner_user_id: uploaded_by,
        }
    }
}

/// Action kinds without their resource payload, for logging and matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ViewWorkspace,
    CreateNote,
    EditNote,
    DeleteNote,
    CreateFile,
    DeleteFile,
    DownloadFile,
    DeleteWorkspace,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::ViewWorkspace => "view_workspace",
            ActionKind::CreateNote => "create_note",
            ActionKind::EditNote => "edit_note",
            ActionKind::DeleteNote => "delete_note",
            ActionKind::CreateFile => "create_file",
            ActionKind::DeleteFile => "delete_file",
            ActionKind::DownloadFile => "download_file",
            ActionKind::DeleteWorkspace => "delete_workspace",
        }
    }
}

/// An intended action against a workspace. Resource-scoped actions carry the
/// descriptor of the row they touch, so a scoped check can never be asked
/// without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewWorkspace,
    CreateNote,
    EditNote(ResourceDescriptor),
    DeleteNote(ResourceDescriptor),
    CreateFile,
    DeleteFile(ResourceDescriptor),
    DownloadFile(ResourceDescriptor),
    DeleteWorkspace,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::ViewWorkspace => ActionKind::ViewWorkspace,
            Action::CreateNote => ActionKind::CreateNote,
            Action::EditNote(_) => ActionKind::EditNote,
            Action::DeleteNote(_) => ActionKind::DeleteNote,
            Action::CreateFile => ActionKind::CreateFile,
            Action::DeleteFile(_) => ActionKind::DeleteFile,
            Action::DownloadFile(_) => ActionKind::DownloadFile,
            Action::DeleteWorkspace => ActionKind::DeleteWorkspace,
        }
    }

    pub fn resource(&self) -> Option<&ResourceDescriptor> {
        match self {
            Action::EditNote(r)
            | Action::DeleteNote(r)
            | Action::DeleteFile(r)
            | Action::DownloadFile(r) => Some(r),
            Action::ViewWorkspace
            | Action::CreateNote
            | Action::CreateFile
            | Action::DeleteWorkspace => None,
        }
    }
}
