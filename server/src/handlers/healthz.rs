use actix_web::HttpResponse;
use teamgate_misc::api::HealthResponse;
use teamgate_misc::time::current_timestamp;

use crate::response::Response;

pub async fn get_healthz() -> HttpResponse {
    Response::json(HealthResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: current_timestamp(),
    })
    .into()
}
