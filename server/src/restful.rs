use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::web::{self, Data};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer};
use anyhow::{Context, Result};
use log::{info, warn};
use openssl::ssl::SslAcceptorBuilder;
use sd_notify::NotifyState;
use teamgate_misc::api::member::MEMBERS_PATH;
use teamgate_misc::api::permission::PERMISSIONS_PATH;
use teamgate_misc::api::team::TEAMS_PATH;
use teamgate_misc::api::workspace::WORKSPACES_PATH;
use teamgate_misc::api::{CommonResponse, HEALTHZ_PATH};

use crate::context::ServerContext;
use crate::handlers::{healthz, members, permissions, teams, workspaces};

pub struct RestfulServer {
    ssl: Option<SslAcceptorBuilder>,
    ctx: Arc<ServerContext>,

    keep_alive_secs: Option<u64>,
    workers: Option<u64>,

    bind: String,
}

impl RestfulServer {
    pub fn new(bind: String, ctx: Arc<ServerContext>) -> Self {
        Self {
            ssl: None,
            ctx,
            keep_alive_secs: None,
            workers: None,
            bind,
        }
    }

    pub fn set_ssl(&mut self, ssl: SslAcceptorBuilder) {
        self.ssl = Some(ssl);
    }

    pub fn set_keep_alive_secs(&mut self, keep_alive_secs: u64) {
        self.keep_alive_secs = Some(keep_alive_secs);
    }

    pub fn set_workers(&mut self, workers: u64) {
        self.workers = Some(workers);
    }

    pub async fn run(mut self) -> Result<()> {
        let ctx = self.ctx.clone();
        let mut srv = HttpServer::new(move || {
            App::new()
                .app_data(Data::new(ctx.clone()))
                .service(
                    web::scope(WORKSPACES_PATH)
                        .route("", web::put().to(workspaces::put_workspace))
                        .route("", web::get().to(workspaces::list_workspaces))
                        .route("/{id}", web::get().to(workspaces::get_workspace))
                        .route("/{id}", web::patch().to(workspaces::patch_workspace))
                        .route("/{id}", web::delete().to(workspaces::delete_workspace)),
                )
                .service(
                    web::scope(TEAMS_PATH)
                        .route("/{workspace_id}", web::put().to(teams::put_team))
                        .route("/{workspace_id}", web::get().to(teams::list_teams))
                        .route("/{workspace_id}/{team_id}", web::get().to(teams::get_team))
                        .route(
                            "/{workspace_id}/{team_id}",
                            web::patch().to(teams::patch_team),
                        )
                        .route(
                            "/{workspace_id}/{team_id}",
                            web::delete().to(teams::delete_team),
                        )
                        .route(
                            "/{workspace_id}/{team_id}/permissions",
                            web::put().to(teams::sync_team_permissions),
                        )
                        .route(
                            "/{workspace_id}/{team_id}/permissions",
                            web::get().to(teams::list_team_permissions),
                        ),
                )
                .service(
                    web::scope(MEMBERS_PATH)
                        .route(
                            "/{workspace_id}/{team_id}",
                            web::put().to(members::put_member),
                        )
                        .route(
                            "/{workspace_id}/{team_id}",
                            web::get().to(members::list_members),
                        )
                        .route(
                            "/{workspace_id}/{team_id}/{member_id}",
                            web::delete().to(members::delete_member),
                        )
                        .route(
                            "/{workspace_id}/{team_id}/{member_id}/accept",
                            web::post().to(members::accept_member),
                        )
                        .route(
                            "/{workspace_id}/{team_id}/{member_id}/reject",
                            web::post().to(members::reject_member),
                        ),
                )
                .service(
                    web::scope(PERMISSIONS_PATH)
                        .route("", web::put().to(permissions::put_permission))
                        .route("", web::get().to(permissions::list_permissions))
                        .route("/{id}", web::get().to(permissions::get_permission))
                        .route("/{id}", web::patch().to(permissions::patch_permission))
                        .route("/{id}", web::delete().to(permissions::delete_permission)),
                )
                .service(web::resource(HEALTHZ_PATH).route(web::get().to(healthz::get_healthz)))
                .default_service(web::route().to(Self::default_handler))
        });

        if let Some(ssl) = self.ssl.take() {
            info!("Binding to https://{}", self.bind);
            srv = srv.bind_openssl(&self.bind, ssl).context("bind with ssl")?
        } else {
            warn!("Using HTTP (without SSL). THIS IS DANGEROUS, DO NOT USE IN PRODUCTION");
            info!("Binding to http://{}", self.bind);
            srv = srv.bind(&self.bind).context("bind without ssl")?
        };

        if let Some(keep_alive) = self.keep_alive_secs {
            srv = srv.keep_alive(Duration::from_secs(keep_alive));
        }
        if let Some(workers) = self.workers {
            srv = srv.workers(workers as usize);
        }

        sd_notify::notify(true, &[NotifyState::Ready]).context("notify systemd")?;
        info!("Starting restful server");
        srv.run().await.context("run server")?;

        info!("Server stopped by user");
        Ok(())
    }

    async fn default_handler(req: HttpRequest) -> HttpResponse {
        let path = req.uri().path().to_string();
        let method = req.method().as_str().to_string();
        let message = format!("No route to {method} {path}");
        let ret = CommonResponse {
            code: StatusCode::NOT_FOUND.into(),
            message: Some(message),
        };
        HttpResponse::NotFound().json(ret)
    }
}
