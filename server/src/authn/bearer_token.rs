use actix_web::HttpRequest;
use anyhow::{bail, Result};
use teamgate_misc::api::HEADER_AUTHORIZATION;

use super::{Authenticator, AuthnResponse, AuthnUserInfo, TokenValidator};

pub struct BearerTokenAuthenticator<T: TokenValidator> {
    validator: T,
}

impl<T: TokenValidator> BearerTokenAuthenticator<T> {
    pub fn new(validator: T) -> Self {
        Self { validator }
    }
}

impl<T: TokenValidator> Authenticator for BearerTokenAuthenticator<T> {
    fn authenticate_request(
        &self,
        req: &HttpRequest,
        _user: Option<AuthnUserInfo>,
    ) -> Result<AuthnResponse> {
        let auth = match req.headers().get(HEADER_AUTHORIZATION) {
            Some(auth) => match auth.to_str() {
                Ok(auth) => auth.trim().to_string(),
                Err(_) => return Ok(AuthnResponse::Continue),
            },
            None => return Ok(AuthnResponse::Continue),
        };

        if auth.is_empty() {
            return Ok(AuthnResponse::Continue);
        }

        let mut iter = auth.split_whitespace();
        let bearer = match iter.next() {
            Some(bearer) => bearer,
            None => return Ok(AuthnResponse::Unauthenticated),
        };
        if bearer.to_lowercase() != "bearer" {
            return Ok(AuthnResponse::Unauthenticated);
        }

        let token = match iter.next() {
            Some(token) => token,
            None => return Ok(AuthnResponse::Unauthenticated),
        };
        if token.is_empty() {
            return Ok(AuthnResponse::Unauthenticated);
        }

        let user = match self.validator.validate_token(token) {
            Ok(user) => user,
            Err(_) => return Ok(AuthnResponse::Unauthenticated),
        };
        if user.user_id.is_empty() {
            bail!("empty subject in validated token");
        }

        Ok(AuthnResponse::Ok(user))
    }
}
