use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why the policy refused an action. Each reason is a distinct outcome and
/// maps to its own API error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    #[error("authentication required")]
    NotAuthenticated,

    #[error("you do not have access to this workspace")]
    NotAMember,

    #[error("resource does not belong to this workspace")]
    WrongWorkspace,

    #[error("you do not have permission to perform this action")]
    InsufficientRole,
}

impl DenyReason {
    pub fn code(&self) -> &'static str {
        match self {
            DenyReason::NotAuthenticated => "NOT_AUTHENTICATED",
            DenyReason::NotAMember => "NOT_A_MEMBER",
            DenyReason::WrongWorkspace => "WRONG_WORKSPACE",
            DenyReason::InsufficientRole => "INSUFFICIENT_ROLE",
        }
    }
}

/// Result of a policy evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn reason(&self) -> Option<DenyReason> {
        match self {
            Decision::Allow => None,
            Decision::Deny(reason) => Some(*reason),
        }
    }

    pub fn into_result(self) -> Result<(), DenyReason> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(reason),
        }
    }
}
