//! Domain operations behind the HTTP handlers.
//!
//! Every workspace-scoped operation asks the policy before touching data;
//! none of them inspect roles directly.

pub mod auth_service;
pub mod error;
pub mod file_service;
pub mod note_service;
pub mod workspace_service;

pub use auth_service::{AuthService, Session};
pub use error::{ServiceError, ServiceResult};
pub use file_service::{FileDownload, FileService, FileView, UploadRequest};
pub use note_service::{NoteService, NoteView};
pub use workspace_service::{JoinOutcome, WorkspaceService, WorkspaceSummary, WorkspaceView};

use uuid::Uuid;

use crate::database::WorkspaceStore;
use crate::policy::{resolve, Action, Decision};
use crate::types::Role;

/// Run the policy for `actor` and turn a denial into `ServiceError::Denied`.
/// On success returns the role the decision was made with.
pub(crate) async fn require(
    store: &dyn WorkspaceStore,
    actor: Uuid,
    workspace_id: Uuid,
    action: Action,
) -> ServiceResult<Role> {
    let outcome = resolve(store, Some(actor), workspace_id, &action).await?;
    match (outcome.decision, outcome.role) {
        (Decision::Allow, Some(role)) => Ok(role),
        (Decision::Deny(reason), _) => Err(ServiceError::Denied {
            action: action.kind(),
            reason,
        }),
        (Decision::Allow, None) => Err(ServiceError::Internal(format!(
            "{} allowed without a membership",
            action.kind().as_str()
        ))),
    }
}

/// Trimmed value, or a validation error carrying `message` when blank.
pub(crate) fn required(value: &str, message: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ServiceError::validation(message))
    } else {
        Ok(trimmed.to_string())
    }
}
