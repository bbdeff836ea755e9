// /api/workspaces and the notes and files nested under a workspace

pub mod files;
pub mod notes;
pub mod workspace;
