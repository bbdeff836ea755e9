use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::{require, required, ServiceError, ServiceResult};
use crate::database::models::{Membership, NewWorkspace, Workspace};
use crate::database::{DatabaseError, WorkspaceStore};
use crate::policy::Action;
use crate::storage::ObjectStore;
use crate::types::Role;

pub const MAX_WORKSPACE_NAME_LEN: usize = 100;
const INVITE_CODE_LEN: usize = 10;
const INVITE_CODE_ATTEMPTS: usize = 5;

/// A workspace as seen by one member. The invite code is only present for
/// the owner.
#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceView {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_code: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl WorkspaceView {
    pub fn new(workspace: Workspace, role: Role) -> Self {
        Self {
            id: workspace.id,
            name: workspace.name,
            owner_id: workspace.owner_id,
            invite_code: role.is_owner().then_some(workspace.invite_code),
            role,
            created_at: workspace.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceSummary {
    #[serde(flatten)]
    pub workspace: WorkspaceView,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinOutcome {
    pub workspace: WorkspaceView,
    pub membership: Membership,
    /// False when the caller was already a member and nothing changed
    pub joined: bool,
}

pub struct WorkspaceService {
    store: Arc<dyn WorkspaceStore>,
    objects: Arc<dyn ObjectStore>,
}

impl WorkspaceService {
    pub fn new(store: Arc<dyn WorkspaceStore>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { store, objects }
    }

    /// Create a workspace owned by `actor`, with a fresh invite code.
    pub async fn create(&self, actor: Uuid, name: &str) -> ServiceResult<WorkspaceView> {
        let name = required(name, "Workspace name is required")?;
        if name.chars().count() > MAX_WORKSPACE_NAME_LEN {
            return Err(ServiceError::validation(format!(
                "Workspace name must be at most {} characters",
                MAX_WORKSPACE_NAME_LEN
            )));
        }

        for attempt in 1..=INVITE_CODE_ATTEMPTS {
            let new_workspace = NewWorkspace {
                name: name.clone(),
                owner_id: actor,
                invite_code: generate_invite_code(),
            };

            match self.store.create_workspace(new_workspace).await {
                Ok(workspace) => {
                    info!(workspace_id = %workspace.id, owner_id = %actor, "workspace created");
                    return Ok(WorkspaceView::new(workspace, Role::Owner));
                }
                Err(DatabaseError::Conflict(_)) => {
                    warn!(attempt, "invite code collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ServiceError::Internal(
            "could not generate a unique invite code".to_string(),
        ))
    }

    /// Join by invite code. Joining twice returns the existing membership
    /// without changing its role.
    pub async fn join(&self, actor: Uuid, invite_code: &str) -> ServiceResult<JoinOutcome> {
        let code = required(invite_code, "Invite code is required")?.to_uppercase();

        let workspace = self
            .store
            .find_workspace_by_invite_code(&code)
            .await?
            .ok_or_else(|| ServiceError::not_found("Invalid invite code"))?;

        let existing = self.store.membership_role(workspace.id, actor).await?;
        let membership = self
            .store
            .add_member(workspace.id, actor, Role::Member)
            .await?;

        let joined = existing.is_none();
        if joined {
            info!(workspace_id = %workspace.id, user_id = %actor, "member joined workspace");
        }

        Ok(JoinOutcome {
            workspace: WorkspaceView::new(workspace, membership.role),
            membership,
            joined,
        })
    }

    /// Workspaces `actor` belongs to, most recently joined first.
    pub async fn list(&self, actor: Uuid) -> ServiceResult<Vec<WorkspaceSummary>> {
        let memberships = self.store.list_memberships(actor).await?;

        Ok(memberships
            .into_iter()
            .map(|m| WorkspaceSummary {
                workspace: WorkspaceView::new(m.workspace, m.role),
                joined_at: m.joined_at,
            })
            .collect())
    }

    pub async fn get(&self, actor: Uuid, workspace_id: Uuid) -> ServiceResult<WorkspaceView> {
        let role = require(self.store.as_ref(), actor, workspace_id, Action::ViewWorkspace).await?;

        let workspace = self
            .store
            .find_workspace(workspace_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Workspace not found"))?;
        Ok(WorkspaceView::new(workspace, role))
    }

    /// Delete the workspace and everything in it. Stored objects are removed
    /// after the rows; a failure there only leaves orphans behind.
    pub async fn delete(&self, actor: Uuid, workspace_id: Uuid) -> ServiceResult<()> {
        require(self.store.as_ref(), actor, workspace_id, Action::DeleteWorkspace).await?;

        if !self.store.delete_workspace(workspace_id).await? {
            return Err(ServiceError::not_found("Workspace not found"));
        }
        info!(workspace_id = %workspace_id, "workspace deleted");

        match self.objects.delete_prefix(&workspace_id.to_string()).await {
            Ok(removed) => info!(workspace_id = %workspace_id, removed, "workspace objects removed"),
            Err(e) => warn!(workspace_id = %workspace_id, error = %e, "failed to remove workspace objects"),
        }

        Ok(())
    }
}

fn generate_invite_code() -> String {
    Uuid::new_v4().simple().to_string()[..INVITE_CODE_LEN].to_uppercase()
}
