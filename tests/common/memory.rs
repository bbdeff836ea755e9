//! In-memory `WorkspaceStore` with the same uniqueness and cascade rules as
//! the Postgres schema.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use teamspace_api::database::models::{
    Membership, NewFile, NewNote, NewUser, NewWorkspace, Note, User, Workspace, WorkspaceFile,
    WorkspaceMembership,
};
use teamspace_api::database::{DatabaseError, WorkspaceStore};
use teamspace_api::policy::{AccessDirectory, ResourceDescriptor};
use teamspace_api::types::{ResourceKind, Role};

#[derive(Default)]
struct Tables {
    clock: i64,
    users: Vec<User>,
    workspaces: Vec<Workspace>,
    members: Vec<Membership>,
    notes: Vec<Note>,
    files: Vec<WorkspaceFile>,
}

impl Tables {
    /// Strictly increasing timestamps so newest-first ordering is stable.
    fn now(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        Utc.timestamp_millis_opt(1_700_000_000_000 + self.clock).unwrap()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_file_inserts: AtomicBool,
    invite_conflicts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `create_file` fail like a dropped connection.
    pub fn fail_file_inserts(&self, fail: bool) {
        self.fail_file_inserts.store(fail, Ordering::SeqCst);
    }

    /// Reject the next `count` workspace inserts as if their invite code
    /// were already taken.
    pub fn collide_invite_codes(&self, count: usize) {
        self.invite_conflicts.store(count, Ordering::SeqCst);
    }

    pub fn workspace_count(&self) -> usize {
        self.tables.lock().unwrap().workspaces.len()
    }

    pub fn membership_count(&self, workspace_id: Uuid) -> usize {
        self.tables
            .lock()
            .unwrap()
            .members
            .iter()
            .filter(|m| m.workspace_id == workspace_id)
            .count()
    }

    pub fn note_count(&self, workspace_id: Uuid) -> usize {
        self.tables
            .lock()
            .unwrap()
            .notes
            .iter()
            .filter(|n| n.workspace_id == workspace_id)
            .count()
    }

    pub fn file_count(&self, workspace_id: Uuid) -> usize {
        self.tables
            .lock()
            .unwrap()
            .files
            .iter()
            .filter(|f| f.workspace_id == workspace_id)
            .count()
    }
}

#[async_trait]
impl AccessDirectory for MemoryStore {
    async fn membership_role(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Role>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .members
            .iter()
            .find(|m| m.workspace_id == workspace_id && m.user_id == user_id)
            .map(|m| m.role))
    }

    async fn resource_by_id(
        &self,
        kind: ResourceKind,
        id: Uuid,
    ) -> Result<Option<ResourceDescriptor>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(match kind {
            ResourceKind::Note => tables.notes.iter().find(|n| n.id == id).map(Note::descriptor),
            ResourceKind::File => tables
                .files
                .iter()
                .find(|f| f.id == id)
                .map(WorkspaceFile::descriptor),
        })
    }
}

#[async_trait]
impl WorkspaceStore for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(DatabaseError::Conflict("email already registered".into()));
        }
        let row = User {
            id: Uuid::new_v4(),
            email: user.email,
            full_name: user.full_name,
            password_hash: user.password_hash,
            created_at: tables.now(),
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_workspace(&self, workspace: NewWorkspace) -> Result<Workspace, DatabaseError> {
        let injected = self
            .invite_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(DatabaseError::Conflict("invite code taken".into()));
        }
        let mut tables = self.tables.lock().unwrap();
        if tables
            .workspaces
            .iter()
            .any(|w| w.invite_code == workspace.invite_code)
        {
            return Err(DatabaseError::Conflict("invite code taken".into()));
        }
        let created_at = tables.now();
        let row = Workspace {
            id: Uuid::new_v4(),
            name: workspace.name,
            owner_id: workspace.owner_id,
            invite_code: workspace.invite_code,
            created_at,
        };
        tables.workspaces.push(row.clone());
        tables.members.push(Membership {
            workspace_id: row.id,
            user_id: row.owner_id,
            role: Role::Owner,
            created_at,
        });
        Ok(row)
    }

    async fn find_workspace(&self, id: Uuid) -> Result<Option<Workspace>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.workspaces.iter().find(|w| w.id == id).cloned())
    }

    async fn find_workspace_by_invite_code(
        &self,
        invite_code: &str,
    ) -> Result<Option<Workspace>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .workspaces
            .iter()
            .find(|w| w.invite_code == invite_code)
            .cloned())
    }

    async fn delete_workspace(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.workspaces.len();
        tables.workspaces.retain(|w| w.id != id);
        if tables.workspaces.len() == before {
            return Ok(false);
        }
        tables.members.retain(|m| m.workspace_id != id);
        tables.notes.retain(|n| n.workspace_id != id);
        tables.files.retain(|f| f.workspace_id != id);
        Ok(true)
    }

    async fn add_member(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> Result<Membership, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(existing) = tables
            .members
            .iter()
            .find(|m| m.workspace_id == workspace_id && m.user_id == user_id)
        {
            return Ok(existing.clone());
        }
        let row = Membership {
            workspace_id,
            user_id,
            role,
            created_at: tables.now(),
        };
        tables.members.push(row.clone());
        Ok(row)
    }

    async fn list_memberships(&self, user_id: Uuid) -> Result<Vec<WorkspaceMembership>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<WorkspaceMembership> = tables
            .members
            .iter()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| {
                tables
                    .workspaces
                    .iter()
                    .find(|w| w.id == m.workspace_id)
                    .map(|w| WorkspaceMembership {
                        role: m.role,
                        joined_at: m.created_at,
                        workspace: w.clone(),
                    })
            })
            .collect();
        rows.sort_by(|a, b| b.joined_at.cmp(&a.joined_at));
        Ok(rows)
    }

    async fn create_note(&self, note: NewNote) -> Result<Note, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        let row = Note {
            id: Uuid::new_v4(),
            workspace_id: note.workspace_id,
            title: note.title,
            content: note.content,
            created_by: note.created_by,
            created_at: tables.now(),
        };
        tables.notes.push(row.clone());
        Ok(row)
    }

    async fn list_notes(&self, workspace_id: Uuid) -> Result<Vec<Note>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<Note> = tables
            .notes
            .iter()
            .filter(|n| n.workspace_id == workspace_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn update_note(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Option<Note>, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.notes.iter_mut().find(|n| n.id == id).map(|note| {
            note.title = title.to_string();
            note.content = content.to_string();
            note.clone()
        }))
    }

    async fn delete_note(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.notes.len();
        tables.notes.retain(|n| n.id != id);
        Ok(tables.notes.len() != before)
    }

    async fn create_file(&self, file: NewFile) -> Result<WorkspaceFile, DatabaseError> {
        if self.fail_file_inserts.load(Ordering::SeqCst) {
            return Err(DatabaseError::QueryError("connection reset by peer".into()));
        }
        let mut tables = self.tables.lock().unwrap();
        let row = WorkspaceFile {
            id: file.id,
            workspace_id: file.workspace_id,
            file_name: file.file_name,
            file_path: file.file_path,
            size_bytes: file.size_bytes,
            content_type: file.content_type,
            uploaded_by: file.uploaded_by,
            created_at: tables.now(),
        };
        tables.files.push(row.clone());
        Ok(row)
    }

    async fn find_file(&self, id: Uuid) -> Result<Option<WorkspaceFile>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.files.iter().find(|f| f.id == id).cloned())
    }

    async fn list_files(&self, workspace_id: Uuid) -> Result<Vec<WorkspaceFile>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<WorkspaceFile> = tables
            .files
            .iter()
            .filter(|f| f.workspace_id == workspace_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn delete_file(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.files.len();
        tables.files.retain(|f| f.id != id);
        Ok(tables.files.len() != before)
    }
}
