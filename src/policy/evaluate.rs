use uuid::Uuid;

use super::action::{Action, ResourceDescriptor};
use super::decision::{Decision, DenyReason};
use crate::types::Role;

/// Decide whether `actor` may perform `action` in `workspace_id`.
///
/// `role` is the actor's membership role in the target workspace, already
/// resolved by the caller (`None` when no membership row exists). The order
/// of checks is fixed: authentication, membership, resource placement, then
/// role/ownership.
pub fn evaluate(
    actor: Option<Uuid>,
    role: Option<Role>,
    workspace_id: Uuid,
    action: &Action,
) -> Decision {
    let Some(actor) = actor else {
        return Decision::Deny(DenyReason::NotAuthenticated);
    };

    let Some(role) = role else {
        return Decision::Deny(DenyReason::NotAMember);
    };

    match action {
        Action::ViewWorkspace | Action::CreateNote | Action::CreateFile => Decision::Allow,

        Action::EditNote(resource) | Action::DeleteNote(resource) | Action::DeleteFile(resource) => {
            if resource.workspace_id != workspace_id {
                return Decision::Deny(DenyReason::WrongWorkspace);
            }
            if can_manage(actor, role, resource) {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::InsufficientRole)
            }
        }

        Action::DownloadFile(resource) => {
            if resource.workspace_id != workspace_id {
                return Decision::Deny(DenyReason::WrongWorkspace);
            }
            Decision::Allow
        }

        Action::DeleteWorkspace => {
            if role.is_owner() {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::InsufficientRole)
            }
        }
    }
}

/// Owner of the workspace, or creator of the resource.
pub fn can_manage(actor: Uuid, role: Role, resource: &ResourceDescriptor) -> bool {
    role.is_owner() || resource.owner_user_id == actor
}
