use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{
    Membership, NewFile, NewNote, NewUser, NewWorkspace, Note, User, Workspace, WorkspaceFile,
    WorkspaceMembership,
};
use super::store::WorkspaceStore;
use crate::policy::{AccessDirectory, ResourceDescriptor};
use crate::types::{ResourceKind, Role};

const USER_COLUMNS: &str = "id, email, full_name, password_hash, created_at";
const WORKSPACE_COLUMNS: &str = "id, name, owner_id, invite_code, created_at";
const NOTE_COLUMNS: &str = "id, workspace_id, title, content, created_by, created_at";
const FILE_COLUMNS: &str =
    "id, workspace_id, file_name, file_path, size_bytes, content_type, uploaded_by, created_at";

/// PostgreSQL-backed store. Cascades are enforced by foreign keys.
#[derive(Clone)]
pub struct PgWorkspaceStore {
    pool: PgPool,
}

impl PgWorkspaceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessDirectory for PgWorkspaceStore {
    async fn membership_role(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Role>, DatabaseError> {
        let role: Option<String> = sqlx::query_scalar(
            "SELECT role FROM workspace_members WHERE workspace_id = $1 AND user_id = $2",
        )
        .bind(workspace_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        role.map(|r| r.parse::<Role>())
            .transpose()
            .map_err(|e| DatabaseError::QueryError(e.to_string()))
    }

    async fn resource_by_id(
        &self,
        kind: ResourceKind,
        id: Uuid,
    ) -> Result<Option<ResourceDescriptor>, DatabaseError> {
        let sql = match kind {
            ResourceKind::Note => "SELECT workspace_id, created_by FROM notes WHERE id = $1",
            ResourceKind::File => "SELECT workspace_id, uploaded_by FROM files WHERE id = $1",
        };

        let row: Option<(Uuid, Uuid)> = sqlx::query_as(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(workspace_id, owner_user_id)| ResourceDescriptor {
            kind,
            id,
            workspace_id,
            owner_user_id,
        }))
    }
}

#[async_trait]
impl WorkspaceStore for PgWorkspaceStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (id, email, full_name, password_hash) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.email)
            .bind(&user.full_name)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_insert(e, format!("email '{}' is already registered", user.email)))
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_workspace(&self, workspace: NewWorkspace) -> Result<Workspace, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO workspaces (id, name, owner_id, invite_code) VALUES ($1, $2, $3, $4) RETURNING {}",
            WORKSPACE_COLUMNS
        );
        let created = sqlx::query_as::<_, Workspace>(&sql)
            .bind(Uuid::new_v4())
            .bind(&workspace.name)
            .bind(workspace.owner_id)
            .bind(&workspace.invite_code)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| DatabaseError::from_insert(e, "invite code collision"))?;

        sqlx::query("INSERT INTO workspace_members (workspace_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(created.id)
            .bind(created.owner_id)
            .bind(Role::Owner.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn find_workspace(&self, id: Uuid) -> Result<Option<Workspace>, DatabaseError> {
        let sql = format!("SELECT {} FROM workspaces WHERE id = $1", WORKSPACE_COLUMNS);
        Ok(sqlx::query_as::<_, Workspace>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_workspace_by_invite_code(
        &self,
        invite_code: &str,
    ) -> Result<Option<Workspace>, DatabaseError> {
        let sql = format!("SELECT {} FROM workspaces WHERE invite_code = $1", WORKSPACE_COLUMNS);
        Ok(sqlx::query_as::<_, Workspace>(&sql)
            .bind(invite_code)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_workspace(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM workspaces WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_member(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> Result<Membership, DatabaseError> {
        sqlx::query(
            "INSERT INTO workspace_members (workspace_id, user_id, role) VALUES ($1, $2, $3) \
             ON CONFLICT (workspace_id, user_id) DO NOTHING",
        )
        .bind(workspace_id)
        .bind(user_id)
        .bind(role.as_str())
        .execute(&self.pool)
        .await?;

        let membership = sqlx::query_as::<_, Membership>(
            "SELECT workspace_id, user_id, role, created_at FROM workspace_members \
             WHERE workspace_id = $1 AND user_id = $2",
        )
        .bind(workspace_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(membership)
    }

    async fn list_memberships(&self, user_id: Uuid) -> Result<Vec<WorkspaceMembership>, DatabaseError> {
        let rows = sqlx::query_as::<_, WorkspaceMembership>(
            r#"
            SELECT m.role, m.created_at AS joined_at,
                   w.id, w.name, w.owner_id, w.invite_code, w.created_at
            FROM workspace_members m
            JOIN workspaces w ON w.id = m.workspace_id
            WHERE m.user_id = $1
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create_note(&self, note: NewNote) -> Result<Note, DatabaseError> {
        let sql = format!(
            "INSERT INTO notes (id, workspace_id, title, content, created_by) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            NOTE_COLUMNS
        );
        Ok(sqlx::query_as::<_, Note>(&sql)
            .bind(Uuid::new_v4())
            .bind(note.workspace_id)
            .bind(&note.title)
            .bind(&note.content)
            .bind(note.created_by)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_notes(&self, workspace_id: Uuid) -> Result<Vec<Note>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM notes WHERE workspace_id = $1 ORDER BY created_at DESC",
            NOTE_COLUMNS
        );
        Ok(sqlx::query_as::<_, Note>(&sql)
            .bind(workspace_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update_note(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Option<Note>, DatabaseError> {
        let sql = format!(
            "UPDATE notes SET title = $2, content = $3 WHERE id = $1 RETURNING {}",
            NOTE_COLUMNS
        );
        Ok(sqlx::query_as::<_, Note>(&sql)
            .bind(id)
            .bind(title)
            .bind(content)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_note(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_file(&self, file: NewFile) -> Result<WorkspaceFile, DatabaseError> {
        let sql = format!(
            "INSERT INTO files (id, workspace_id, file_name, file_path, size_bytes, content_type, uploaded_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            FILE_COLUMNS
        );
        sqlx::query_as::<_, WorkspaceFile>(&sql)
            .bind(file.id)
            .bind(file.workspace_id)
            .bind(&file.file_name)
            .bind(&file.file_path)
            .bind(file.size_bytes)
            .bind(&file.content_type)
            .bind(file.uploaded_by)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_insert(e, format!("file path '{}' already exists", file.file_path)))
    }

    async fn find_file(&self, id: Uuid) -> Result<Option<WorkspaceFile>, DatabaseError> {
        let sql = format!("SELECT {} FROM files WHERE id = $1", FILE_COLUMNS);
        Ok(sqlx::query_as::<_, WorkspaceFile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_files(&self, workspace_id: Uuid) -> Result<Vec<WorkspaceFile>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM files WHERE workspace_id = $1 ORDER BY created_at DESC",
            FILE_COLUMNS
        );
        Ok(sqlx::query_as::<_, WorkspaceFile>(&sql)
            .bind(workspace_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn delete_file(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
