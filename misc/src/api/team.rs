use serde::{Deserialize, Serialize};

pub const TEAMS_PATH: &str = "/api/teams";

/// A workspace-scoped group holding a set of permissions, with members.
/// The effective tenant of a team is always its workspace's tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,

    pub name: String,

    /// Unique within the owning workspace.
    pub slug: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub workspace_id: String,

    pub create_time: u64,
    pub update_time: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PutTeamRequest {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PatchTeamRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Replaces the full permission set of a team. Repeating the call with
/// the same set yields the same end state.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SyncTeamPermissionsRequest {
    pub permission_ids: Vec<String>,
}
