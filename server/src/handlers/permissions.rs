use std::sync::Arc;

use actix_web::web::{self, Bytes, Data};
use actix_web::{HttpRequest, HttpResponse};
use teamgate_misc::api::permission::{PatchPermissionRequest, Permission, PutPermissionRequest};
use teamgate_misc::api::{ListResponse, Query};
use teamgate_misc::time::current_timestamp;
use uuid::Uuid;

use crate::authz::{Denial, EntityKind};
use crate::context::ServerContext;
use crate::db::slug::generate_unique_slug;
use crate::db::types::PatchPermissionParams;
use crate::response::Response;
use crate::{auth_request, expect_json, tenant_id};

/// Fetches a permission and hides records of other tenants as not found.
macro_rules! get_tenant_permission {
    ($tx:expr, $id:expr, $tenant_id:expr) => {
        match $tx.get_permission($id)? {
            Some(permission) if permission.tenant_id == $tenant_id => permission,
            _ => return Ok(Response::denied(Denial::NotFound(EntityKind::Permission))),
        }
    };
}

pub async fn put_permission(
    req: HttpRequest,
    body: Bytes,
    sc: Data<Arc<ServerContext>>,
) -> HttpResponse {
    let user = auth_request!(sc.as_ref(), req);
    let tenant_id = tenant_id!(user);
    let put: PutPermissionRequest = expect_json!(body);

    if put.name.trim().is_empty() {
        return Response::bad_request("Permission name is required").into();
    }
    if let Some(ref slug) = put.slug {
        if slug.trim().is_empty() {
            return Response::bad_request("Permission slug cannot be empty").into();
        }
    }

    let result = sc.db.with_transaction(|tx| {
        let slug = match put.slug {
            Some(ref slug) => {
                if tx.permission_slug_exists(&tenant_id, slug)? {
                    return Ok(Response::bad_request("Permission slug already exists"));
                }
                slug.clone()
            }
            None => generate_unique_slug(&put.name, |candidate| {
                tx.permission_slug_exists(&tenant_id, candidate)
            })?,
        };

        let now = current_timestamp();
        let permission = Permission {
            id: Uuid::new_v4().to_string(),
            name: put.name.clone(),
            slug,
            description: put.description.clone(),
            tenant_id: tenant_id.clone(),
            create_time: now,
            update_time: now,
        };
        tx.create_permission(&permission)?;
        Ok(Response::json(permission))
    });

    match result {
        Ok(resp) => resp.into(),
        Err(err) => Response::database_error(err).into(),
    }
}

pub async fn list_permissions(
    req: HttpRequest,
    query: web::Query<Query>,
    sc: Data<Arc<ServerContext>>,
) -> HttpResponse {
    let user = auth_request!(sc.as_ref(), req);
    let tenant_id = tenant_id!(user);
    let query = query.into_inner();

    let result = sc.db.with_transaction(|tx| {
        let items = tx.list_permissions(&tenant_id, query.clone())?;
        let total = tx.count_permissions(&tenant_id, query)?;
        Ok(Response::json(ListResponse { items, total }))
    });

    match result {
        Ok(resp) => resp.into(),
        Err(err) => Response::database_error(err).into(),
    }
}

pub async fn get_permission(
    req: HttpRequest,
    path: web::Path<String>,
    sc: Data<Arc<ServerContext>>,
) -> HttpResponse {
    let user = auth_request!(sc.as_ref(), req);
    let tenant_id = tenant_id!(user);
    let id = path.into_inner();

    let result = sc.db.with_transaction(|tx| {
        let permission = get_tenant_permission!(tx, &id, tenant_id);
        Ok(Response::json(permission))
    });

    match result {
        Ok(resp) => resp.into(),
        Err(err) => Response::database_error(err).into(),
    }
}

pub async fn patch_permission(
    req: HttpRequest,
    path: web::Path<String>,
    body: Bytes,
    sc: Data<Arc<ServerContext>>,
) -> HttpResponse {
    let user = auth_request!(sc.as_ref(), req);
    let tenant_id = tenant_id!(user);
    let id = path.into_inner();
    let patch: PatchPermissionRequest = expect_json!(body);

    if patch.name.is_none() && patch.description.is_none() {
        return Response::bad_request("Nothing to update").into();
    }
    if let Some(ref name) = patch.name {
        if name.trim().is_empty() {
            return Response::bad_request("Permission name cannot be empty").into();
        }
    }

    let result = sc.db.with_transaction(|tx| {
        let permission = get_tenant_permission!(tx, &id, tenant_id);

        tx.update_permission(PatchPermissionParams {
            id: permission.id.clone(),
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

pub async fn delete_permission(
    req: HttpRequest,
    path: web::Path<String>,
    sc: Data<Arc<ServerContext>>,
) -> HttpResponse {
    let user = auth_request!(sc.as_ref(), req);
    let tenant_id = tenant_id!(user);
    let id = path.into_inner();

    let result = sc.db.with_transaction(|tx| {
        let permission = get_tenant_permission!(tx, &id, tenant_id);

        tx.delete_permission(&permission.id)?;
        Ok(Response::ok())
    });

    match result {
        Ok(resp) => resp.into(),
        Err(err) => Response::database_error(err).into(),
    }
}
