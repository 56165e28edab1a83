use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use openssl::ssl::{SslAcceptor, SslAcceptorBuilder, SslMethod};
use serde::{Deserialize, Serialize};
use teamgate_misc::config::{CommonConfig, PathSet};
use teamgate_misc::logs::LogsConfig;

use crate::authn::jwt::JwtTokenValidator;
use crate::authn::BearerTokenAuthenticator;
use crate::context::ServerContext;
use crate::db::config::DbConfig;
use crate::restful::RestfulServer;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_bind")]
    pub bind: String,

    #[serde(default)]
    pub ssl: bool,

    #[serde(default)]
    pub db: DbConfig,

    pub keep_alive_secs: Option<u64>,

    pub workers: Option<u64>,

    /// File name of the identity provider's RSA public key (PEM), under
    /// the pki directory. Access tokens are validated against this key.
    #[serde(default = "ServerConfig::default_token_public_key")]
    pub token_public_key: String,

    #[serde(default)]
    pub logs: LogsConfig,

    #[serde(skip)]
    pki_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: Self::default_bind(),
            ssl: false,
            db: DbConfig::default(),
            keep_alive_secs: None,
            workers: None,
            token_public_key: Self::default_token_public_key(),
            logs: LogsConfig::default(),
            pki_dir: PathBuf::new(),
        }
    }
}

impl CommonConfig for ServerConfig {
    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        if self.bind.is_empty() {
            bail!("bind is required");
        }

        if self.token_public_key.is_empty() {
            bail!("token_public_key is required");
        }

        self.db.complete(ps).context("db")?;

        if let Some(keep_alive_secs) = self.keep_alive_secs {
            if keep_alive_secs == 0 {
                bail!("keep_alive_secs must be greater than 0");
            }
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                bail!("workers must be greater than 0");
            }
        }

        self.logs.complete(ps).context("logs")?;

        self.pki_dir = ps.pki_path.clone();

        Ok(())
    }
}

impl ServerConfig {
    pub fn build_ctx(&self) -> Result<Arc<ServerContext>> {
        let db = self.db.build().context("init database")?;

        let public_key_path = self.pki_dir.join(&self.token_public_key);
        if !public_key_path.exists() {
            bail!(
                "token public key not found: {}, place the identity provider's RSA public key there",
                public_key_path.display()
            );
        }
        let public_key = fs::read(&public_key_path).context("read token public key")?;
        let validator = JwtTokenValidator::new(&public_key).context("init jwt token validator")?;

        let ctx = ServerContext {
            db,
            authenticator: BearerTokenAuthenticator::new(validator),
            cfg: self.clone(),
        };
        Ok(Arc::new(ctx))
    }

    pub fn build_restful_server(&self, ctx: Arc<ServerContext>) -> Result<RestfulServer> {
        let mut srv = RestfulServer::new(self.bind.clone(), ctx);
        if self.ssl {
            let ssl = self.build_ssl()?;
            srv.set_ssl(ssl);
        }

        if let Some(keep_alive_secs) = self.keep_alive_secs {
            srv.set_keep_alive_secs(keep_alive_secs);
        }

        if let Some(workers) = self.workers {
            srv.set_workers(workers);
        }

        Ok(srv)
    }

    fn build_ssl(&self) -> Result<SslAcceptorBuilder> {
        let key_path = self.pki_dir.join("key.pem");
        if !key_path.exists() {
            bail!("ssl key file not exists: {:?}", key_path);
        }

        let cert_path = self.pki_dir.join("cert.pem");
        if !cert_path.exists() {
            bail!("ssl cert file not exists: {:?}", cert_path);
        }

        let mut builder =
            SslAcceptor::mozilla_intermediate(SslMethod::tls()).context("init ssl acceptor")?;

        builder
            .set_private_key_file(&key_path, openssl::ssl::SslFiletype::PEM)
            .context("load ssl key file")?;
        builder
            .set_certificate_chain_file(&cert_path)
            .context("load ssl cert file")?;

        Ok(builder)
    }

    fn default_bind() -> String {
        String::from("127.0.0.1:13688")
    }

    fn default_token_public_key() -> String {
        String::from("token_public.pem")
    }
}
