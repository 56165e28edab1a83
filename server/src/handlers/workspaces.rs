use std::sync::Arc;

use actix_web::web::{self, Bytes, Data};
use actix_web::{HttpRequest, HttpResponse};
use teamgate_misc::api::workspace::{PatchWorkspaceRequest, PutWorkspaceRequest, Workspace};
use teamgate_misc::api::{ListResponse, Query};
use teamgate_misc::time::current_timestamp;
use uuid::Uuid;

use crate::authz::facade::authorize_workspace_ownership;
use crate::authz::{Denial, EntityKind};
use crate::context::ServerContext;
use crate::db::slug::generate_unique_slug;
use crate::response::Response;
use crate::{auth_request, expect_json, tenant_id};

pub async fn put_workspace(
    req: HttpRequest,
    body: Bytes,
    sc: Data<Arc<ServerContext>>,
) -> HttpResponse {
    let user = auth_request!(sc.as_ref(), req);
    let tenant_id = tenant_id!(user);
    let put: PutWorkspaceRequest = expect_json!(body);

    if put.name.trim().is_empty() {
        return Response::bad_request("Workspace name is required").into();
    }

    let result = sc.db.with_transaction(|tx| {
        let slug = generate_unique_slug(&put.name, |candidate| {
            tx.workspace_slug_exists(&tenant_id, candidate)
        })?;

        let now = current_timestamp();
        let workspace = Workspace {
            id: Uuid::new_v4().to_string(),
            name: put.name.clone(),
            slug,
            owner_user_id: user.user_id.clone(),
            tenant_id: tenant_id.clone(),
            create_time: now,
            update_time: now,
        };
        tx.create_workspace(&workspace)?;
        Ok(Response::json(workspace))
    });

    match result {
        Ok(resp) => resp.into(),
        Err(err) => Response::database_error(err).into(),
    }
}

pub async fn list_workspaces(
    req: HttpRequest,
    query: web::Query<Query>,
    sc: Data<Arc<ServerContext>>,
) -> HttpResponse {
    let user = auth_request!(sc.as_ref(), req);
    let tenant_id = tenant_id!(user);

    // Workspace visibility is ownership-only, so listing is restricted
    // to the caller's own workspaces.
    let mut query = query.into_inner();
    query.owner = Some(user.user_id.clone());

    let result = sc.db.with_transaction(|tx| {
        let items = tx.list_workspaces(&tenant_id, query.clone())?;
        let total = tx.count_workspaces(&tenant_id, query)?;
        Ok(Response::json(ListResponse { items, total }))
    });

    match result {
        Ok(resp) => resp.into(),
        Err(err) => Response::database_error(err).into(),
    }
}

pub async fn get_workspace(
    req: HttpRequest,
    path: web::Path<String>,
    sc: Data<Arc<ServerContext>>,
) -> HttpResponse {
    let user = auth_request!(sc.as_ref(), req);
    let tenant_id = tenant_id!(user);
    let id = path.into_inner();

    let result = sc.db.with_transaction(|tx| {
        let workspace = match tx.get_workspace(&id)? {
            Some(workspace) => workspace,
            None => return Ok(Response::denied(Denial::NotFound(EntityKind::Workspace))),
        };
        if let Err(denial) = authorize_workspace_ownership(&user.user_id, &workspace, &tenant_id) {
            return Ok(Response::denied(denial));
        }
        Ok(Response::json(workspace))
    });

    match result {
        Ok(resp) => resp.into(),
        Err(err) => Response::database_error(err).into(),
    }
}

pub async fn patch_workspace(
    req: HttpRequest,
    path: web::Path<String>,
    body: Bytes,
    sc: Data<Arc<ServerContext>>,
) -> HttpResponse {
    let user = auth_request!(sc.as_ref(), req);
    let tenant_id = tenant_id!(user);
    let id = path.into_inner();
    let patch: PatchWorkspaceRequest = expect_json!(body);

    let name = match patch.name {
        Some(name) if !name.trim().is_empty() => name,
        Some(_) => return Response::bad_request("Workspace name cannot be empty").into(),
        None => return Response::bad_request("Nothing to update").into(),
    };

    let result = sc.db.with_transaction(|tx| {
        let workspace = match tx.get_workspace(&id)? {
            Some(workspace) => workspace,
            None => return Ok(Response::denied(Denial::NotFound(EntityKind::Workspace))),
        };
        if let Err(denial) = authorize_workspace_ownership(&user.user_id, &workspace, &tenant_id) {
            return Ok(Response::denied(denial));
        }

        tx.update_workspace(&id, &name, current_timestamp())?;
        Ok(Response::ok())
    });

    match result {
        Ok(resp) => resp.into(),
        Err(err) => Response::database_error(err).into(),
    }
}

pub async fn delete_workspace(
    req: HttpRequest,
    path: web::Path<String>,
    sc: Data<Arc<ServerContext>>,
) -> HttpResponse {
    let user = auth_request!(sc.as_ref(), req);
    let tenant_id = tenant_id!(user);
    let id = path.into_inner();

    let result = sc.db.with_transaction(|tx| {
        let workspace = match tx.get_workspace(&id)? {
            Some(workspace) => workspace,
            None => return Ok(Response::denied(Denial::NotFound(EntityKind::Workspace))),
        };
        if let Err(denial) = authorize_workspace_ownership(&user.user_id, &workspace, &tenant_id) {
            return Ok(Response::denied(denial));
        }

        tx.delete_workspace(&id)?;
        Ok(Response::ok())
    });

    match result {
        Ok(resp) => resp.into(),
        Err(err) => Response::database_error(err).into(),
    }
}
