use std::sync::Arc;

use actix_web::web::{self, Bytes, Data};
use actix_web::{HttpRequest, HttpResponse};
use teamgate_misc::api::member::{MemberStatus, PutTeamMemberRequest, TeamMember};
use teamgate_misc::time::current_timestamp;
use uuid::Uuid;

use crate::authz::facade::{authorize_team_member_operation, MemberAction};
use crate::authz::{Denial, EntityKind};
use crate::context::ServerContext;
use crate::response::Response;
use crate::{auth_request, expect_json, tenant_id};

pub async fn put_member(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: Bytes,
    sc: Data<Arc<ServerContext>>,
) -> HttpResponse {
    let user = auth_request!(sc.as_ref(), req);
    let tenant_id = tenant_id!(user);
    let (workspace_id, team_id) = path.into_inner();
    let put: PutTeamMemberRequest = expect_json!(body);

    let result = sc.db.with_transaction(|tx| {
        let workspace = match tx.get_workspace(&workspace_id)? {
            Some(workspace) => workspace,
            None => return Ok(Response::denied(Denial::NotFound(EntityKind::Workspace))),
        };
        // The team may be unresolved here; the facade still runs the
        // permission check first so unauthorized callers cannot probe.
        let team = tx.get_team(&team_id)?;
        if let Err(denial) = authorize_team_member_operation(
            tx,
            &user,
            &workspace,
            team.as_ref(),
            None,
            &tenant_id,
            MemberAction::Create,
        )? {
            return Ok(Response::denied(denial));
        }

        let now = current_timestamp();
        let member = TeamMember {
            id: Uuid::new_v4().to_string(),
            team_id: team_id.clone(),
            user_id: put.user_id.clone(),
            email: put.email.clone(),
            status: MemberStatus::Pending,
            create_time: now,
            update_time: now,
        };
        tx.create_member(&member)?;
        Ok(Response::json(member))
    });

    match result {
        Ok(resp) => resp.into(),
        Err(err) => Response::database_error(err).into(),
    }
}

pub async fn list_members(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    sc: Data<Arc<ServerContext>>,
) -> HttpResponse {
    let user = auth_request!(sc.as_ref(), req);
    let tenant_id = tenant_id!(user);
    let (workspace_id, team_id) = path.into_inner();

    let result = sc.db.with_transaction(|tx| {
        let workspace = match tx.get_workspace(&workspace_id)? {
            Some(workspace) => workspace,
            None => return Ok(Response::denied(Denial::NotFound(EntityKind::Workspace))),
        };
        let team = match tx.get_team(&team_id)? {
            Some(team) => team,
            None => return Ok(Response::denied(Denial::NotFound(EntityKind::Team))),
        };
        if let Err(denial) = authorize_team_member_operation(
            tx,
            &user,
            &workspace,
            Some(&team),
            None,
            &tenant_id,
            MemberAction::View,
        )? {
            return Ok(Response::denied(denial));
        }

        let members = tx.list_members(&team.id)?;
        Ok(Response::json(members))
    });

    match result {
        Ok(resp) => resp.into(),
        Err(err) => Response::database_error(err).into(),
    }
}

pub async fn delete_member(
    req: HttpRequest,
    path: web::Path<(String, String, String)>,
    sc: Data<Arc<ServerContext>>,
) -> HttpResponse {
    let user = auth_request!(sc.as_ref(), req);
    let tenant_id = tenant_id!(user);
    let (workspace_id, team_id, member_id) = path.into_inner();

    let result = sc.db.with_transaction(|tx| {
        let workspace = match tx.get_workspace(&workspace_id)? {
            Some(workspace) => workspace,
            None => return Ok(Response::denied(Denial::NotFound(EntityKind::Workspace))),
        };
        let team = match tx.get_team(&team_id)? {
            Some(team) => team,
            None => return Ok(Response::denied(Denial::NotFound(EntityKind::Team))),
        };
        let member = tx.get_member(&member_id)?;
        if let Err(denial) = authorize_team_member_operation(
            tx,
            &user,
            &workspace,
            Some(&team),
            member.as_ref(),
            &tenant_id,
            MemberAction::Delete,
        )? {
            return Ok(Response::denied(denial));
        }

        tx.delete_member(&member_id)?;
        Ok(Response::ok())
    });

    match result {
        Ok(resp) => resp.into(),
        Err(err) => Response::database_error(err).into(),
    }
}

pub async fn accept_member(
    req: HttpRequest,
    path: web::Path<(String, String, String)>,
    sc: Data<Arc<ServerContext>>,
) -> HttpResponse {
    respond_to_invitation(req, path, sc, MemberAction::Accept).await
}

pub async fn reject_member(
    req: HttpRequest,
    path: web::Path<(String, String, String)>,
    sc: Data<Arc<ServerContext>>,
) -> HttpResponse {
    respond_to_invitation(req, path, sc, MemberAction::Reject).await
}

/// Accept flips the invitation to active and binds it to the accepting
/// user; reject removes the record. Both only apply while the invitation
/// is still pending.
async fn respond_to_invitation(
    req: HttpRequest,
    path: web::Path<(String, String, String)>,
    sc: Data<Arc<ServerContext>>,
    action: MemberAction,
) -> HttpResponse {
    let user = auth_request!(sc.as_ref(), req);
    let tenant_id = tenant_id!(user);
    let (workspace_id, team_id, member_id) = path.into_inner();

    let result = sc.db.with_transaction(|tx| {
        let workspace = match tx.get_workspace(&workspace_id)? {
            Some(workspace) => workspace,
            None => return Ok(Response::denied(Denial::NotFound(EntityKind::Workspace))),
        };
        let team = match tx.get_team(&team_id)? {
            Some(team) => team,
            None => return Ok(Response::denied(Denial::NotFound(EntityKind::Team))),
        };
        let member = tx.get_member(&member_id)?;
        if let Err(denial) = authorize_team_member_operation(
            tx,
            &user,
            &workspace,
            Some(&team),
            member.as_ref(),
            &tenant_id,
            action,
        )? {
            return Ok(Response::denied(denial));
        }

        // The facade already reported an absent record as not found.
        let member = match member {
            Some(member) => member,
            None => return Ok(Response::denied(Denial::NotFound(EntityKind::TeamMember))),
        };
        if member.status != MemberStatus::Pending {
            return Ok(Response::bad_request("Invitation is no longer pending"));
        }

        match action {
            MemberAction::Accept => {
                tx.activate_member(&member, &user.user_id, current_timestamp())?
            }
            _ => tx.delete_member(&member.id)?,
        }
        Ok(Response::ok())
    });

    match result {
        Ok(resp) => resp.into(),
        Err(err) => Response::database_error(err).into(),
    }
}
