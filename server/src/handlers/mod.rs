pub mod healthz;
pub mod members;
pub mod permissions;
pub mod teams;
pub mod workspaces;

use actix_web::HttpRequest;
use log::error;

use crate::authn::{Authenticator, AuthnResponse, AuthnUserInfo};
use crate::context::ServerContext;
use crate::response::{self, Response};

/// Authenticates the request, yielding the user or the HTTP response to
/// return as-is.
#[macro_export]
macro_rules! auth_request {
    ($sc:expr, $req:expr) => {
        match $crate::handlers::authenticate_request($sc, &$req) {
            Ok(user) => user,
            Err(resp) => return resp.into(),
        }
    };
}

/// Resolves the tenant id from the authenticated user's access token.
#[macro_export]
macro_rules! tenant_id {
    ($user:expr) => {
        match $crate::authz::resolve_tenant_id(&$user.token) {
            Ok(id) => id.to_string(),
            Err(denial) => return $crate::response::Response::denied(denial).into(),
        }
    };
}

/// Parses the request body as JSON into the expected type.
#[macro_export]
macro_rules! expect_json {
    ($body:expr) => {
        match serde_json::from_slice(&$body) {
            Ok(obj) => obj,
            Err(_) => {
                return $crate::response::Response::bad_request("Invalid json payload").into()
            }
        }
    };
}

pub fn authenticate_request(
    sc: &ServerContext,
    req: &HttpRequest,
) -> Result<AuthnUserInfo, Response> {
    match sc.authenticator.authenticate_request(req, None) {
        Ok(AuthnResponse::Ok(user)) => Ok(user),
        Ok(AuthnResponse::Continue) | Ok(AuthnResponse::Unauthenticated) => {
            Err(Response::unauthenticated(response::AUTHN_ERROR))
        }
        Err(err) => {
            error!("Authenticate request error: {err:#}");
            Err(Response::error(response::AUTHN_ERROR))
        }
    }
}
