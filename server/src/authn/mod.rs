mod bearer_token;

pub mod jwt;

use actix_web::HttpRequest;
use anyhow::Result;

pub use bearer_token::BearerTokenAuthenticator;

use crate::authz::AccessToken;

/// Trait for request authenticators.
///
/// Implementors of this trait can authenticate HTTP requests and optionally
/// chain with other authenticators to provide multiple authentication methods.
pub trait Authenticator: Send + Sync {
    /// Attempts to authenticate a request.
    ///
    /// # Returns
    ///
    /// * `Ok(AuthnResponse::Ok(user))` - Authentication successful with user info
    /// * `Ok(AuthnResponse::Continue)` - Authentication skipped, try next authenticator
    /// * `Ok(AuthnResponse::Unauthenticated)` - Authentication failed
    /// * `Err(_)` - Internal error during authentication
    fn authenticate_request(
        &self,
        req: &HttpRequest,
        user: Option<AuthnUserInfo>,
    ) -> Result<AuthnResponse>;
}

/// Response from an authentication attempt.
#[derive(Debug)]
pub enum AuthnResponse {
    /// Authentication successful, contains authenticated user information
    Ok(AuthnUserInfo),
    /// Authentication skipped, should try next authenticator
    Continue,
    /// Authentication failed, should stop authentication chain
    Unauthenticated,
}

/// Information about an authenticated user, extracted from the access
/// token issued by the identity provider.
#[derive(Debug, Clone)]
pub struct AuthnUserInfo {
    /// Subject identifier of the user
    pub user_id: String,
    /// Email address claim, empty when the provider did not include one
    pub email: String,
    /// Tenant-identifying claims carried by the token
    pub token: AccessToken,
}

/// Trait for validating access tokens and extracting user identity.
pub trait TokenValidator: Send + Sync {
    fn validate_token(&self, token: &str) -> Result<AuthnUserInfo>;
}
