use crate::authn::jwt::JwtTokenValidator;
use crate::authn::BearerTokenAuthenticator;
use crate::config::ServerConfig;
use crate::db::Database;

pub struct ServerContext {
    pub db: Database,

    pub authenticator: BearerTokenAuthenticator<JwtTokenValidator>,

    pub cfg: ServerConfig,
}

impl ServerContext {
    #[cfg(test)]
    pub fn new_test() -> Self {
        Self {
            db: Database::new_test(),
            authenticator: BearerTokenAuthenticator::new(JwtTokenValidator::new_test()),
            cfg: ServerConfig::default(),
        }
    }
}
