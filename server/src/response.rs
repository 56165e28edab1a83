use actix_web::http::StatusCode;
use actix_web::{HttpResponse, HttpResponseBuilder};
use serde::{de::DeserializeOwned, Serialize};
use teamgate_misc::api::{CommonResponse, ResourceResponse};

use crate::authz::Denial;
use crate::db::types::ValidationFailed;

pub const AUTHN_ERROR: &str = "Authentication failed";
pub const DATABASE_ERROR: &str = "Database error";
pub const JSON_ERROR: &str = "Encode or decode JSON failed";

/// A wrapper struct for HTTP responses that provides convenient methods
/// for creating common response types
pub struct Response {
    http_response: HttpResponse,
}

impl Response {
    pub fn not_found() -> Self {
        Self::err_response(StatusCode::NOT_FOUND, "Resource not found".to_string())
    }

    pub fn bad_request(message: impl AsRef<str>) -> Self {
        let message = format!("Bad request: {}", message.as_ref());
        Self::err_response(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthenticated(message: impl AsRef<str>) -> Self {
        let message = format!("Unauthenticated: {}", message.as_ref());
        Self::err_response(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: &str) -> Self {
        let message = format!("Forbidden: {message}");
        Self::err_response(StatusCode::FORBIDDEN, message)
    }

    pub fn error(message: &str) -> Self {
        let message = format!("Server error: {message}");
        Self::err_response(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn ok() -> Self {
        Self::ok_response()
    }

    pub fn json<T: Serialize + DeserializeOwned>(data: T) -> Self {
        Self::resource_response(data)
    }

    /// Maps a typed authorization denial to its HTTP shape. Structural
    /// mismatches surface as not-found so callers cannot distinguish an
    /// entity in another tenant from a missing one.
    pub fn denied(denial: Denial) -> Self {
        match denial {
            Denial::MissingContext => Self::bad_request(denial.to_string()),
            Denial::NotFound(kind) => {
                Self::err_response(StatusCode::NOT_FOUND, format!("{kind} not found"))
            }
            Denial::Forbidden => Self::forbidden("operation not allowed"),
        }
    }

    /// Maps a store error to its HTTP shape. Input validation failures
    /// are the caller's fault, everything else is a server error.
    pub fn database_error(err: anyhow::Error) -> Self {
        if let Some(failed) = err.downcast_ref::<ValidationFailed>() {
            return Self::bad_request(failed.to_string());
        }
        log::error!("Database error: {err:#}");
        Self::error(DATABASE_ERROR)
    }

    fn ok_response() -> Self {
        let resp = CommonResponse {
            code: StatusCode::OK.into(),
            message: None,
        };
        Self {
            http_response: HttpResponse::Ok().json(resp),
        }
    }

    fn resource_response<T: Serialize + DeserializeOwned>(rsc: T) -> Self {
        let resp = ResourceResponse::<T> {
            code: StatusCode::OK.into(),
            message: None,
            data: Some(rsc),
        };
        Self {
            http_response: HttpResponse::Ok().json(resp),
        }
    }

    fn err_response(status: StatusCode, message: String) -> Self {
        let resp = CommonResponse {
            code: status.into(),
            message: Some(message),
        };
        Self {
            http_response: HttpResponseBuilder::new(status).json(resp),
        }
    }
}

impl From<Response> for HttpResponse {
    fn from(val: Response) -> Self {
        val.http_response
    }
}
