//! Workspace authorization policy.
//!
//! One evaluator decides every workspace-scoped action: creating, editing and
//! deleting notes, uploading, downloading and deleting files, viewing and
//! deleting the workspace itself. Handlers never inline role checks; they
//! build an [`Action`] and ask [`authorize`].

mod action;
mod decision;
mod directory;
mod evaluate;

pub use action::{Action, ActionKind, ResourceDescriptor};
pub use decision::{Decision, DenyReason};
pub use directory::{authorize, resolve, AccessDirectory, Authorization};
pub use evaluate::{can_manage, evaluate};
