use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub const MEMBERS_PATH: &str = "/api/members";

/// A user's (or pending invitee's) membership record in a team.
///
/// Exactly one of `user_id` / `email` is populated at creation. A pending
/// member identified by email becomes a full member once the matching
/// registered user accepts the invitation; only active members identified
/// by `user_id` participate in permission checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,

    pub team_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub status: MemberStatus,

    pub create_time: u64,
    pub update_time: u64,
}

/// Membership lifecycle. The only transition is `pending -> active`, via
/// the invited user's own accept action; removal is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberStatus {
    #[serde(rename = "pending")]
    Pending,

    #[serde(rename = "active")]
    Active,
}

impl Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberStatus::Pending => write!(f, "pending"),
            MemberStatus::Active => write!(f, "active"),
        }
    }
}

impl MemberStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(MemberStatus::Pending),
            "active" => Some(MemberStatus::Active),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PutTeamMemberRequest {
    /// Identifier of a registered user to invite.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Email address to invite. Either way the member stays pending
    /// until the invited identity accepts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
