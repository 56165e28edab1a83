use teamgate_misc::api::member::TeamMember;
use teamgate_misc::api::team::Team;
use teamgate_misc::api::workspace::Workspace;

use super::{Decision, Denial, EntityKind};

pub fn workspace_belongs_to_tenant(workspace: &Workspace, tenant_id: &str) -> bool {
    workspace.tenant_id == tenant_id
}

pub fn team_belongs_to_workspace(team: &Team, workspace: &Workspace) -> bool {
    team.workspace_id == workspace.id
}

pub fn member_belongs_to_team(member: &TeamMember, team: &Team) -> bool {
    member.team_id == team.id
}

/// Validates that a chain of entities nests correctly within the tenant.
///
/// Checks run strictly in nesting order, tenant -> workspace -> team ->
/// member, and fail fast at the first broken link with `NotFound` for
/// that entity. A workspace that fails the tenant check is reported
/// before any deeper check runs, so callers cannot distinguish another
/// tenant's workspace from a nonexistent one.
pub fn validate_context(
    tenant_id: &str,
    workspace: &Workspace,
    team: Option<&Team>,
    member: Option<&TeamMember>,
) -> Decision {
    if !workspace_belongs_to_tenant(workspace, tenant_id) {
        return Err(Denial::NotFound(EntityKind::Workspace));
    }

    if let Some(team) = team {
        if !team_belongs_to_workspace(team, workspace) {
            return Err(Denial::NotFound(EntityKind::Team));
        }

        if let Some(member) = member {
            if !member_belongs_to_team(member, team) {
                return Err(Denial::NotFound(EntityKind::TeamMember));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use teamgate_misc::api::member::MemberStatus;

    use super::*;

    fn test_workspace(id: &str, tenant_id: &str) -> Workspace {
        Workspace {
            id: id.to_string(),
            name: id.to_string(),
            slug: id.to_string(),
            owner_user_id: "owner".to_string(),
            tenant_id: tenant_id.to_string(),
            create_time: 0,
            update_time: 0,
        }
    }

    fn test_team(id: &str, workspace_id: &str) -> Team {
        Team {
            id: id.to_string(),
            name: id.to_string(),
            slug: id.to_string(),
            description: None,
            workspace_id: workspace_id.to_string(),
            create_time: 0,
            update_time: 0,
        }
    }

    fn test_member(id: &str, team_id: &str) -> TeamMember {
        TeamMember {
            id: id.to_string(),
            team_id: team_id.to_string(),
            user_id: Some("user".to_string()),
            email: None,
            status: MemberStatus::Active,
            create_time: 0,
            update_time: 0,
        }
    }

    #[test]
    fn test_predicates() {
        let ws = test_workspace("ws1", "tenant1");
        assert!(workspace_belongs_to_tenant(&ws, "tenant1"));
        assert!(!workspace_belongs_to_tenant(&ws, "tenant2"));

        let team = test_team("team1", "ws1");
        assert!(team_belongs_to_workspace(&team, &ws));
        assert!(!team_belongs_to_workspace(&test_team("team2", "ws2"), &ws));

        let member = test_member("m1", "team1");
        assert!(member_belongs_to_team(&member, &team));
        assert!(!member_belongs_to_team(&test_member("m2", "other"), &team));
    }

    #[test]
    fn test_validate_context_ok() {
        let ws = test_workspace("ws1", "tenant1");
        let team = test_team("team1", "ws1");
        let member = test_member("m1", "team1");

        assert_eq!(validate_context("tenant1", &ws, None, None), Ok(()));
        assert_eq!(validate_context("tenant1", &ws, Some(&team), None), Ok(()));
        assert_eq!(
            validate_context("tenant1", &ws, Some(&team), Some(&member)),
            Ok(())
        );
    }

    #[test]
    fn test_validate_context_fail_fast() {
        let ws = test_workspace("ws1", "tenant1");
        let foreign_team = test_team("team1", "other_ws");
        let member = test_member("m1", "team1");

        // Tenant check runs first: even with a broken team link deeper in
        // the chain, a cross-tenant workspace is reported as the missing
        // entity.
        assert_eq!(
            validate_context("tenant2", &ws, Some(&foreign_team), Some(&member)),
            Err(Denial::NotFound(EntityKind::Workspace))
        );

        // Team link breaks next
        assert_eq!(
            validate_context("tenant1", &ws, Some(&foreign_team), Some(&member)),
            Err(Denial::NotFound(EntityKind::Team))
        );

        // Then the member link
        let team = test_team("team1", "ws1");
        let foreign_member = test_member("m1", "other_team");
        assert_eq!(
            validate_context("tenant1", &ws, Some(&team), Some(&foreign_member)),
            Err(Denial::NotFound(EntityKind::TeamMember))
        );
    }
}
