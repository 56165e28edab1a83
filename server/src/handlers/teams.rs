use std::sync::Arc;

use actix_web::web::{self, Bytes, Data};
use actix_web::{HttpRequest, HttpResponse};
use teamgate_misc::api::permission::{TEAMS_CREATE, TEAMS_DELETE, TEAMS_UPDATE, TEAMS_VIEW};
use teamgate_misc::api::team::{PatchTeamRequest, PutTeamRequest, SyncTeamPermissionsRequest, Team};
use teamgate_misc::api::{ListResponse, Query};
use teamgate_misc::time::current_timestamp;
use uuid::Uuid;

use crate::authz::facade::authorize_team_operation;
use crate::authz::{Denial, EntityKind};
use crate::context::ServerContext;
use crate::db::slug::generate_unique_slug;
use crate::db::types::{PatchTeamParams, ValidationFailed};
use crate::response::Response;
use crate::{auth_request, expect_json, tenant_id};

pub async fn put_team(
    req: HttpRequest,
    path: web::Path<String>,
    body: Bytes,
    sc: Data<Arc<ServerContext>>,
) -> HttpResponse {
    let user = auth_request!(sc.as_ref(), req);
    let tenant_id = tenant_id!(user);
    let workspace_id = path.into_inner();
    let put: PutTeamRequest = expect_json!(body);

    if put.name.trim().is_empty() {
        return Response::bad_request("Team name is required").into();
    }

    let result = sc.db.with_transaction(|tx| {
        let workspace = match tx.get_workspace(&workspace_id)? {
            Some(workspace) => workspace,
            None => return Ok(Response::denied(Denial::NotFound(EntityKind::Workspace))),
        };
        if let Err(denial) =
            authorize_team_operation(tx, &user.user_id, &workspace, None, &tenant_id, TEAMS_CREATE)?
        {
            return Ok(Response::denied(denial));
        }

        let slug = generate_unique_slug(&put.name, |candidate| {
            tx.team_slug_exists(&workspace.id, candidate)
        })?;

        let now = current_timestamp();
        let team = Team {
            id: Uuid::new_v4().to_string(),
            name: put.name.clone(),
            slug,
            description: put.description.clone(),
            workspace_id: workspace.id.clone(),
            create_time: now,
            update_time: now,
        };
        tx.create_team(&team)?;
        Ok(Response::json(team))
    });

    match result {
        Ok(resp) => resp.into(),
        Err(err) => Response::database_error(err).into(),
    }
}

pub async fn list_teams(
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<Query>,
    sc: Data<Arc<ServerContext>>,
) -> HttpResponse {
    let user = auth_request!(sc.as_ref(), req);
    let tenant_id = tenant_id!(user);
    let workspace_id = path.into_inner();
    let query = query.into_inner();

    let result = sc.db.with_transaction(|tx| {
        let workspace = match tx.get_workspace(&workspace_id)? {
            Some(workspace) => workspace,
            None => return Ok(Response::denied(Denial::NotFound(EntityKind::Workspace))),
        };
        if let Err(denial) =
            authorize_team_operation(tx, &user.user_id, &workspace, None, &tenant_id, TEAMS_VIEW)?
        {
            return Ok(Response::denied(denial));
        }

        let items = tx.list_teams(&workspace.id, query.clone())?;
        let total = tx.count_teams(&workspace.id, query)?;
        Ok(Response::json(ListResponse { items, total }))
    });

    match result {
        Ok(resp) => resp.into(),
        Err(err) => Response::database_error(err).into(),
    }
}

pub async fn get_team(
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
        if let Err(denial) = authorize_team_operation(
            tx,
            &user.user_id,
            &workspace,
            Some(&team),
            &tenant_id,
            TEAMS_VIEW,
        )? {
            return Ok(Response::denied(denial));
        }

        Ok(Response::json(team))
    });

    match result {
        Ok(resp) => resp.into(),
        Err(err) => Response::database_error(err).into(),
    }
}

pub async fn patch_team(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: Bytes,
    sc: Data<Arc<ServerContext>>,
) -> HttpResponse {
    let user = auth_request!(sc.as_ref(), req);
    let tenant_id = tenant_id!(user);
    let (workspace_id, team_id) = path.into_inner();
    let patch: PatchTeamRequest = expect_json!(body);

    if patch.name.is_none() && patch.description.is_none() {
        return Response::bad_request("Nothing to update").into();
    }
    if let Some(ref name) = patch.name {
        if name.trim().is_empty() {
            return Response::bad_request("Team name cannot be empty").into();
        }
    }

    let result = sc.db.with_transaction(|tx| {
        let workspace = match tx.get_workspace(&workspace_id)? {
            Some(workspace) => workspace,
            None => return Ok(Response::denied(Denial::NotFound(EntityKind::Workspace))),
        };
        let team = match tx.get_team(&team_id)? {
            Some(team) => team,
            None => return Ok(Response::denied(Denial::NotFound(EntityKind::Team))),
        };
        if let Err(denial) = authorize_team_operation(
            tx,
            &user.user_id,
            &workspace,
            Some(&team),
            &tenant_id,
            TEAMS_UPDATE,
        )? {
            return Ok(Response::denied(denial));
        }

        tx.update_team(PatchTeamParams {
            id: team.id.clone(),
            name: patch.name.clone(),
            description: patch.description.clone(),
            update_time: current_timestamp(),
        })?;
        Ok(Response::ok())
    });

    match result {
        Ok(resp) => resp.into(),
        Err(err) => Response::database_error(err).into(),
    }
}

pub async fn delete_team(
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
        if let Err(denial) = authorize_team_operation(
            tx,
            &user.user_id,
            &workspace,
            Some(&team),
            &tenant_id,
            TEAMS_DELETE,
        )? {
            return Ok(Response::denied(denial));
        }

        tx.delete_team(&team.id)?;
        Ok(Response::ok())
    });

    match result {
        Ok(resp) => resp.into(),
        Err(err) => Response::database_error(err).into(),
    }
}

pub async fn sync_team_permissions(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: Bytes,
    sc: Data<Arc<ServerContext>>,
) -> HttpResponse {
    let user = auth_request!(sc.as_ref(), req);
    let tenant_id = tenant_id!(user);
    let (workspace_id, team_id) = path.into_inner();
    let sync: SyncTeamPermissionsRequest = expect_json!(body);

    let result = sc.db.with_transaction(|tx| {
        let workspace = match tx.get_workspace(&workspace_id)? {
            Some(workspace) => workspace,
            None => return Ok(Response::denied(Denial::NotFound(EntityKind::Workspace))),
        };
        let team = match tx.get_team(&team_id)? {
            Some(team) => team,
            None => return Ok(Response::denied(Denial::NotFound(EntityKind::Team))),
        };
        if let Err(denial) = authorize_team_operation(
            tx,
            &user.user_id,
            &workspace,
            Some(&team),
            &tenant_id,
            TEAMS_UPDATE,
        )? {
            return Ok(Response::denied(denial));
        }

        // Permission links may only point inside the caller's tenant.
        for permission_id in sync.permission_ids.iter() {
            let valid = match tx.get_permission(permission_id)? {
                Some(permission) => permission.tenant_id == tenant_id,
                None => false,
            };
            if !valid {
                return Err(ValidationFailed::new(
                    "permission_ids",
                    format!("unknown permission: {permission_id}"),
                )
                .into());
            }
        }

        tx.sync_team_permissions(&team.id, &sync.permission_ids)?;
        Ok(Response::ok())
    });

    match result {
        Ok(resp) => resp.into(),
        Err(err) => Response::database_error(err).into(),
    }
}

pub async fn list_team_permissions(
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
        if let Err(denial) = authorize_team_operation(
            tx,
            &user.user_id,
            &workspace,
            Some(&team),
            &tenant_id,
            TEAMS_VIEW,
        )? {
            return Ok(Response::denied(denial));
        }

        let permissions = tx.list_team_permissions(&team.id)?;
        Ok(Response::json(permissions))
    });

    match result {
        Ok(resp) => resp.into(),
        Err(err) => Response::database_error(err).into(),
    }
}
