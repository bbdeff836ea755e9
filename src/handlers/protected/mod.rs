// handlers/protected/mod.rs - Protected handlers (JWT required)
//
// Security Level: bearer token validated by `jwt_auth_middleware`
// Route Prefix: /api
// Workspace-level permissions are decided by the policy inside each service.

pub mod auth;
pub mod workspaces;
