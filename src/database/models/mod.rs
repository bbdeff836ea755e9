pub mod file;
pub mod note;
pub mod user;
pub mod workspace;

pub use file::{NewFile, WorkspaceFile};
pub use note::{NewNote, Note};
pub use user::{NewUser, User};
pub use workspace::{Membership, NewWorkspace, Workspace, WorkspaceMembership};
