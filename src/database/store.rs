use async_trait::async_trait;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{
    Membership, NewFile, NewNote, NewUser, NewWorkspace, Note, User, Workspace, WorkspaceFile,
    WorkspaceMembership,
};
use crate::policy::AccessDirectory;
use crate::types::Role;

/// Persistence for users, workspaces, memberships, notes and file metadata.
///
/// Implementations must enforce: one membership per (workspace, user),
/// unique user emails and invite codes, and deletion of a workspace removing
/// its memberships, notes and files.
#[async_trait]
pub trait WorkspaceStore: AccessDirectory {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    // Users
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    // Workspaces
    /// Insert the workspace and its owner membership atomically.
    async fn create_workspace(&self, workspace: NewWorkspace) -> Result<Workspace, DatabaseError>;
    async fn find_workspace(&self, id: Uuid) -> Result<Option<Workspace>, DatabaseError>;
    async fn find_workspace_by_invite_code(
        &self,
        invite_code: &str,
    ) -> Result<Option<Workspace>, DatabaseError>;
    /// Returns false when no such workspace existed.
    async fn delete_workspace(&self, id: Uuid) -> Result<bool, DatabaseError>;

    // Memberships
    /// Insert a membership unless one exists; either way return the stored row.
    async fn add_member(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> Result<Membership, DatabaseError>;
    async fn list_memberships(&self, user_id: Uuid) -> Result<Vec<WorkspaceMembership>, DatabaseError>;

    // Notes
    async fn create_note(&self, note: NewNote) -> Result<Note, DatabaseError>;
    async fn list_notes(&self, workspace_id: Uuid) -> Result<Vec<Note>, DatabaseError>;
    async fn update_note(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Option<Note>, DatabaseError>;
    async fn delete_note(&self, id: Uuid) -> Result<bool, DatabaseError>;

    // Files
    async fn create_file(&self, file: NewFile) -> Result<WorkspaceFile, DatabaseError>;
    async fn find_file(&self, id: Uuid) -> Result<Option<WorkspaceFile>, DatabaseError>;
    async fn list_files(&self, workspace_id: Uuid) -> Result<Vec<WorkspaceFile>, DatabaseError>;
    async fn delete_file(&self, id: Uuid) -> Result<bool, DatabaseError>;
}
