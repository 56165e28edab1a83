use serde::{Deserialize, Serialize};

pub const WORKSPACES_PATH: &str = "/api/workspaces";

/// A tenant-scoped container owned by a single user. The owner passes
/// every permission check in the workspace unconditionally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: String,

    pub name: String,

    /// Unique within the owning tenant.
    pub slug: String,

    pub owner_user_id: String,

    /// The OAuth client that owns this workspace. Never changes after
    /// creation.
    pub tenant_id: String,

    pub create_time: u64,
    pub update_time: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PutWorkspaceRequest {
    pub name: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PatchWorkspaceRequest {
    pub name: Option<String>,
}
