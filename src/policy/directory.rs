use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use super::action::{Action, ResourceDescriptor};
use super::decision::Decision;
use super::evaluate::evaluate;
use crate::database::DatabaseError;
use crate::types::{ResourceKind, Role};

/// Lookups the policy needs from storage. Every call reads current state;
/// nothing is cached between requests.
#[async_trait]
pub trait AccessDirectory: Send + Sync {
    /// Role of `user_id` in `workspace_id`, or `None` without a membership row.
    async fn membership_role(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Role>, DatabaseError>;

    /// Placement and owning user of a note or file.
    async fn resource_by_id(
        &self,
        kind: ResourceKind,
        id: Uuid,
    ) -> Result<Option<ResourceDescriptor>, DatabaseError>;
}

/// Outcome of one authorization: the decision and the role it was made with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authorization {
    pub role: Option<Role>,
    pub decision: Decision,
}

/// Resolve the actor's role through `directory` and evaluate `action`.
///
/// Lookup failures are returned unchanged; they are never turned into a
/// decision.
pub async fn authorize<D>(
    directory: &D,
    actor: Option<Uuid>,
    workspace_id: Uuid,
    action: &Action,
) -> Result<Decision, DatabaseError>
where
    D: AccessDirectory + ?Sized,
{
    resolve(directory, actor, workspace_id, action)
        .await
        .map(|outcome| outcome.decision)
}

/// Like [`authorize`], but also hands back the resolved role so callers that
/// need it do not look it up a second time.
pub async fn resolve<D>(
    directory: &D,
    actor: Option<Uuid>,
    workspace_id: Uuid,
    action: &Action,
) -> Result<Authorization, DatabaseError>
where
    D: AccessDirectory + ?Sized,
{
    let role = match actor {
        Some(user_id) => directory.membership_role(workspace_id, user_id).await?,
        None => None,
    };

    let decision = evaluate(actor, role, workspace_id, action);

    match decision {
        Decision::Allow => {
            debug!(
                action = action.kind().as_str(),
                workspace_id = %workspace_id,
                actor = ?actor,
                "policy allowed"
            );
        }
        Decision::Deny(reason) => {
            warn!(
                action = action.kind().as_str(),
                workspace_id = %workspace_id,
                actor = ?actor,
                reason = reason.code(),
                "policy denied"
            );
        }
    }

    Ok(Authorization { role, decision })
}
