mod member;
mod team;
mod workspace;

use teamgate_misc::api::member::{MemberStatus, TeamMember};
use teamgate_misc::api::permission::Permission;
use teamgate_misc::api::team::Team;
use teamgate_misc::api::workspace::Workspace;
use uuid::Uuid;

use super::types::Transaction;

pub fn create_test_workspace(
    tx: &dyn Transaction,
    tenant_id: &str,
    slug: &str,
    owner_user_id: &str,
) -> Workspace {
    let ws = Workspace {
        id: Uuid::new_v4().to_string(),
        name: slug.to_string(),
        slug: slug.to_string(),
        owner_user_id: owner_user_id.to_string(),
        tenant_id: tenant_id.to_string(),
        create_time: 0,
        update_time: 0,
    };
    tx.create_workspace(&ws).unwrap();
    ws
}

pub fn create_test_team(tx: &dyn Transaction, workspace_id: &str, slug: &str) -> Team {
    let team = Team {
        id: Uuid::new_v4().to_string(),
        name: slug.to_string(),
        slug: slug.to_string(),
        description: None,
        workspace_id: workspace_id.to_string(),
        create_time: 0,
        update_time: 0,
    };
    tx.create_team(&team).unwrap();
    team
}

pub fn create_test_member(
    tx: &dyn Transaction,
    team_id: &str,
    user_id: Option<&str>,
    email: Option<&str>,
    status: MemberStatus,
) -> TeamMember {
    let member = TeamMember {
        id: Uuid::new_v4().to_string(),
        team_id: team_id.to_string(),
        user_id: user_id.map(String::from),
        email: email.map(String::from),
        status,
        create_time: 0,
        update_time: 0,
    };
    tx.create_member(&member).unwrap();
    member
}

pub fn create_test_permission(tx: &dyn Transaction, tenant_id: &str, slug: &str) -> Permission {
    let permission = Permission {
        id: Uuid::new_v4().to_string(),
        name: slug.to_string(),
        slug: slug.to_string(),
        description: None,
        tenant_id: tenant_id.to_string(),
        create_time: 0,
        update_time: 0,
    };
    tx.create_permission(&permission).unwrap();
    permission
}
