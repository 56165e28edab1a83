use anyhow::Result;
use teamgate_misc::api::member::TeamMember;
use teamgate_misc::api::permission::{TEAM_MEMBERS_CREATE, TEAM_MEMBERS_DELETE, TEAM_MEMBERS_VIEW};
use teamgate_misc::api::team::Team;
use teamgate_misc::api::workspace::Workspace;

use crate::authn::AuthnUserInfo;
use crate::db::types::Transaction;

use super::{
    has_permission, team_belongs_to_workspace, validate_context, workspace_belongs_to_tenant,
    Decision, Denial, EntityKind,
};

/// The team-member operations with distinct authorization rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberAction {
    Create,
    View,
    Delete,
    Accept,
    Reject,
}

/// Gate for workspace-level view/update/delete.
///
/// Only ownership grants access here; there is no team-permission path
/// for workspace-level operations.
pub fn authorize_workspace_ownership(
    user_id: &str,
    workspace: &Workspace,
    tenant_id: &str,
) -> Decision {
    validate_context(tenant_id, workspace, None, None)?;

    if workspace.owner_user_id != user_id {
        return Err(Denial::Forbidden);
    }

    Ok(())
}

/// Gate for team create/view/update/delete within a workspace.
///
/// Structural checks run first in nesting order, then the permission
/// check; a structurally invalid target never surfaces as Forbidden.
pub fn authorize_team_operation(
    tx: &dyn Transaction,
    user_id: &str,
    workspace: &Workspace,
    team: Option<&Team>,
    tenant_id: &str,
    required_slug: &str,
) -> Result<Decision> {
    if let Err(denial) = validate_context(tenant_id, workspace, team, None) {
        return Ok(Err(denial));
    }

    if !has_permission(tx, user_id, workspace, required_slug)? {
        return Ok(Err(Denial::Forbidden));
    }

    Ok(Ok(()))
}

/// Gate for team-member operations.
///
/// `team` may be absent for `Create` so that an unresolved team id still
/// goes through the permission check first; `member` is required for
/// everything except `Create` and listing under `View`. Absent records
/// are reported as not found.
pub fn authorize_team_member_operation(
    tx: &dyn Transaction,
    user: &AuthnUserInfo,
    workspace: &Workspace,
    team: Option<&Team>,
    member: Option<&TeamMember>,
    tenant_id: &str,
    action: MemberAction,
) -> Result<Decision> {
    match action {
        MemberAction::Create => {
            if !workspace_belongs_to_tenant(workspace, tenant_id) {
                return Ok(Err(Denial::NotFound(EntityKind::Workspace)));
            }

            // The permission check runs before the team nesting check, so
            // an unauthorized caller always sees Forbidden and cannot
            // probe workspace structure through authorization responses.
            if !has_permission(tx, &user.user_id, workspace, TEAM_MEMBERS_CREATE)? {
                return Ok(Err(Denial::Forbidden));
            }

            match team {
                Some(team) if team_belongs_to_workspace(team, workspace) => Ok(Ok(())),
                _ => Ok(Err(Denial::NotFound(EntityKind::Team))),
            }
        }

        MemberAction::View => {
            let team = match team {
                Some(team) => team,
                None => return Ok(Err(Denial::NotFound(EntityKind::Team))),
            };
            if let Err(denial) = validate_context(tenant_id, workspace, Some(team), member) {
                return Ok(Err(denial));
            }

            if !has_permission(tx, &user.user_id, workspace, TEAM_MEMBERS_VIEW)? {
                return Ok(Err(Denial::Forbidden));
            }

            Ok(Ok(()))
        }

        MemberAction::Delete => {
            let team = match team {
                Some(team) => team,
                None => return Ok(Err(Denial::NotFound(EntityKind::Team))),
            };
            let member = match member {
                Some(member) => member,
                None => return Ok(Err(Denial::NotFound(EntityKind::TeamMember))),
            };
            if let Err(denial) = validate_context(tenant_id, workspace, Some(team), Some(member)) {
                return Ok(Err(denial));
            }

            // Members may always remove their own record; this bypasses
            // the permission-slug check entirely.
            if member.user_id.as_deref() == Some(user.user_id.as_str()) {
                return Ok(Ok(()));
            }

            if !has_permission(tx, &user.user_id, workspace, TEAM_MEMBERS_DELETE)? {
                return Ok(Err(Denial::Forbidden));
            }

            Ok(Ok(()))
        }

        MemberAction::Accept | MemberAction::Reject => {
            let team = match team {
                Some(team) => team,
                None => return Ok(Err(Denial::NotFound(EntityKind::Team))),
            };
            let member = match member {
                Some(member) => member,
                None => return Ok(Err(Denial::NotFound(EntityKind::TeamMember))),
            };
            if let Err(denial) = validate_context(tenant_id, workspace, Some(team), Some(member)) {
                return Ok(Err(denial));
            }

            // Invitations are personal acceptance acts, not workspace
            // administration: only the invited identity may respond, and
            // ownership does not override.
            Ok(if is_invited_identity(member, user) {
                Ok(())
            } else {
                Err(Denial::Forbidden)
            })
        }
    }
}

/// Matches a caller against an invitation: by user id when the record
/// carries one, otherwise by the invited email address.
fn is_invited_identity(member: &TeamMember, user: &AuthnUserInfo) -> bool {
    if let Some(user_id) = member.user_id.as_deref() {
        return user_id == user.user_id;
    }
    if let Some(email) = member.email.as_deref() {
        return !user.email.is_empty() && email == user.email;
    }
    false
}

#[cfg(test)]
mod tests {
    use teamgate_misc::api::member::MemberStatus;
    use teamgate_misc::api::permission::TEAMS_UPDATE;

    use crate::authz::AccessToken;
    use crate::db::tests::{
        create_test_member, create_test_permission, create_test_team, create_test_workspace,
    };
    use crate::db::Database;

    use super::*;

    fn test_user(user_id: &str, email: &str) -> AuthnUserInfo {
        AuthnUserInfo {
            user_id: user_id.to_string(),
            email: email.to_string(),
            token: AccessToken::default(),
        }
    }

    #[test]
    fn test_workspace_ownership() {
        let db = Database::new_test();
        db.with_transaction(|tx| {
            let ws = create_test_workspace(tx, "tenant1", "ws1", "owner1");

            assert_eq!(authorize_workspace_ownership("owner1", &ws, "tenant1"), Ok(()));
            assert_eq!(
                authorize_workspace_ownership("user2", &ws, "tenant1"),
                Err(Denial::Forbidden)
            );

            // Cross-tenant access is not found, never forbidden
            assert_eq!(
                authorize_workspace_ownership("owner1", &ws, "tenant2"),
                Err(Denial::NotFound(EntityKind::Workspace))
            );
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_team_operation() {
        let db = Database::new_test();
        db.with_transaction(|tx| {
            let ws = create_test_workspace(tx, "tenant1", "ws1", "owner1");
            let team = create_test_team(tx, &ws.id, "eng");
            let perm = create_test_permission(tx, "tenant1", TEAMS_UPDATE);
            tx.sync_team_permissions(&team.id, &[perm.id.clone()])?;
            create_test_member(tx, &team.id, Some("user2"), None, MemberStatus::Active);

            let decision =
                authorize_team_operation(tx, "user2", &ws, Some(&team), "tenant1", TEAMS_UPDATE)?;
            assert_eq!(decision, Ok(()));

            let decision =
                authorize_team_operation(tx, "user2", &ws, Some(&team), "tenant1", "teams:delete")?;
            assert_eq!(decision, Err(Denial::Forbidden));

            // Owner override applies to team operations
            let decision =
                authorize_team_operation(tx, "owner1", &ws, Some(&team), "tenant1", "teams:delete")?;
            assert_eq!(decision, Ok(()));

            // Tenant mismatch hides the workspace before any permission
            // check
            let decision =
                authorize_team_operation(tx, "owner1", &ws, Some(&team), "tenant2", TEAMS_UPDATE)?;
            assert_eq!(decision, Err(Denial::NotFound(EntityKind::Workspace)));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_member_create_forbidden_before_nesting() {
        let db = Database::new_test();
        db.with_transaction(|tx| {
            let ws = create_test_workspace(tx, "tenant1", "ws1", "owner1");
            let other_ws = create_test_workspace(tx, "tenant1", "ws2", "owner1");
            let foreign_team = create_test_team(tx, &other_ws.id, "eng");
            let user = test_user("user2", "user2@example.com");

            // An unauthorized caller sees Forbidden even though the team
            // is not nested under the workspace
            let decision = authorize_team_member_operation(
                tx,
                &user,
                &ws,
                Some(&foreign_team),
                None,
                "tenant1",
                MemberAction::Create,
            )?;
            assert_eq!(decision, Err(Denial::Forbidden));

            // The owner passes the permission check and then hits the
            // structural failure
            let owner = test_user("owner1", "owner1@example.com");
            let decision = authorize_team_member_operation(
                tx,
                &owner,
                &ws,
                Some(&foreign_team),
                None,
                "tenant1",
                MemberAction::Create,
            )?;
            assert_eq!(decision, Err(Denial::NotFound(EntityKind::Team)));

            // An unresolved team id behaves the same way: Forbidden for
            // the unauthorized caller, not-found for the owner
            let decision = authorize_team_member_operation(
                tx,
                &user,
                &ws,
                None,
                None,
                "tenant1",
                MemberAction::Create,
            )?;
            assert_eq!(decision, Err(Denial::Forbidden));
            let decision = authorize_team_member_operation(
                tx,
                &owner,
                &ws,
                None,
                None,
                "tenant1",
                MemberAction::Create,
            )?;
            assert_eq!(decision, Err(Denial::NotFound(EntityKind::Team)));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_member_delete_self_removal() {
        let db = Database::new_test();
        db.with_transaction(|tx| {
            let ws = create_test_workspace(tx, "tenant1", "ws1", "owner1");
            let team = create_test_team(tx, &ws.id, "eng");
            let member =
                create_test_member(tx, &team.id, Some("user2"), None, MemberStatus::Active);

            // Self-removal needs no permission slug
            let user = test_user("user2", "user2@example.com");
            let decision = authorize_team_member_operation(
                tx,
                &user,
                &ws,
                Some(&team),
                Some(&member),
                "tenant1",
                MemberAction::Delete,
            )?;
            assert_eq!(decision, Ok(()));

            // Owner may remove anyone
            let owner = test_user("owner1", "owner1@example.com");
            let decision = authorize_team_member_operation(
                tx,
                &owner,
                &ws,
                Some(&team),
                Some(&member),
                "tenant1",
                MemberAction::Delete,
            )?;
            assert_eq!(decision, Ok(()));

            // A third user without teamMembers:delete is forbidden
            let other = test_user("user3", "user3@example.com");
            let decision = authorize_team_member_operation(
                tx,
                &other,
                &ws,
                Some(&team),
                Some(&member),
                "tenant1",
                MemberAction::Delete,
            )?;
            assert_eq!(decision, Err(Denial::Forbidden));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_invitation_response_identity_only() {
        let db = Database::new_test();
        db.with_transaction(|tx| {
            let ws = create_test_workspace(tx, "tenant1", "ws1", "owner1");
            let team = create_test_team(tx, &ws.id, "eng");
            let invite = create_test_member(
                tx,
                &team.id,
                None,
                Some("a@x.com"),
                MemberStatus::Pending,
            );

            // The registered user whose email matches the invite may
            // accept
            let invited = test_user("user9", "a@x.com");
            let decision = authorize_team_member_operation(
                tx,
                &invited,
                &ws,
                Some(&team),
                Some(&invite),
                "tenant1",
                MemberAction::Accept,
            )?;
            assert_eq!(decision, Ok(()));

            // A different authenticated user is forbidden
            let other = test_user("user3", "b@x.com");
            let decision = authorize_team_member_operation(
                tx,
                &other,
                &ws,
                Some(&team),
                Some(&invite),
                "tenant1",
                MemberAction::Accept,
            )?;
            assert_eq!(decision, Err(Denial::Forbidden));

            // Ownership does not override invitation responses
            let owner = test_user("owner1", "owner1@example.com");
            let decision = authorize_team_member_operation(
                tx,
                &owner,
                &ws,
                Some(&team),
                Some(&invite),
                "tenant1",
                MemberAction::Reject,
            )?;
            assert_eq!(decision, Err(Denial::Forbidden));
            Ok(())
        })
        .unwrap();
    }
}
