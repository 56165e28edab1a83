use serde::{Deserialize, Serialize};

pub const PERMISSIONS_PATH: &str = "/api/permissions";

/// Slugs for the capabilities the server itself checks.
pub const TEAMS_CREATE: &str = "teams:create";
pub const TEAMS_VIEW: &str = "teams:view";
pub const TEAMS_UPDATE: &str = "teams:update";
pub const TEAMS_DELETE: &str = "teams:delete";
pub const TEAM_MEMBERS_CREATE: &str = "teamMembers:create";
pub const TEAM_MEMBERS_VIEW: &str = "teamMembers:view";
pub const TEAM_MEMBERS_DELETE: &str = "teamMembers:delete";

/// A tenant-scoped named capability, attachable to teams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    pub id: String,

    pub name: String,

    /// Unique within the owning tenant.
    pub slug: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub tenant_id: String,

    pub create_time: u64,
    pub update_time: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PutPermissionRequest {
    pub name: String,

    /// Explicit capability slug, e.g. `teams:update`. Generated from the
    /// name when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PatchPermissionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}
