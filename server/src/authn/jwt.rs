use anyhow::{bail, Result};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::authz::{AccessToken, ClientRef};

use super::{AuthnUserInfo, TokenValidator};

/// Claims carried by access tokens from the identity provider. Standard
/// claims (RFC 7519) plus the provider's identity extensions: the email
/// address of the subject and the OAuth client the token was issued for.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub exp: usize,
    pub sub: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientRef>,
}

/// JSON Web Token validator for verifying and decoding access tokens.
/// Validates token signature and expiration time. Tokens are issued by
/// the identity provider, this side only holds the public key.
pub struct JwtTokenValidator {
    key: DecodingKey,
}

impl JwtTokenValidator {
    /// Creates a new JWT token validator using an RSA public key in PEM
    /// format.
    pub fn new(public_key: &[u8]) -> Result<Self> {
        let key = match DecodingKey::from_rsa_pem(public_key) {
            Ok(key) => key,
            Err(e) => bail!("parse RSA public key for jwt token validation failed: {e}"),
        };
        Ok(Self { key })
    }

    #[cfg(test)]
    pub fn new_test() -> Self {
        let public_key = include_bytes!("testdata/public_key.pem");
        Self::new(public_key).unwrap()
    }
}

impl TokenValidator for JwtTokenValidator {
    fn validate_token(&self, token: &str) -> Result<AuthnUserInfo> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = match decode::<Claims>(token, &self.key, &validation) {
            Ok(data) => data.claims,
            Err(e) => bail!("validate jwt token failed: {e}"),
        };

        if claims.sub.is_empty() {
            bail!("validate jwt token failed: empty subject");
        }

        Ok(AuthnUserInfo {
            user_id: claims.sub,
            email: claims.email.unwrap_or_default(),
            token: AccessToken {
                client_id: claims.client_id,
                client: claims.client,
            },
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use teamgate_misc::time::current_timestamp;

    use crate::authz::resolve_tenant_id;

    use super::*;

    pub(crate) fn test_claims(sub: &str, email: &str, client_id: &str) -> Claims {
        Claims {
            exp: current_timestamp() as usize + 3600,
            sub: sub.to_string(),
            email: Some(email.to_string()),
            client_id: Some(client_id.to_string()),
            client: None,
        }
    }

    pub(crate) fn generate_test_token(claims: Claims) -> String {
        let private_key = include_bytes!("testdata/private_key.pem");
        let key = EncodingKey::from_rsa_pem(private_key).unwrap();
        encode(&Header::new(Algorithm::RS256), &claims, &key).unwrap()
    }

    #[test]
    fn test_validate() {
        let validator = JwtTokenValidator::new_test();

        let token = generate_test_token(test_claims("user1", "user1@example.com", "tenant1"));
        let user = validator.validate_token(&token).unwrap();
        assert_eq!(user.user_id, "user1");
        assert_eq!(user.email, "user1@example.com");
        assert_eq!(resolve_tenant_id(&user.token), Ok("tenant1"));

        // Tenant carried through the nested client relation
        let claims = Claims {
            exp: current_timestamp() as usize + 3600,
            sub: "user1".to_string(),
            email: None,
            client_id: None,
            client: Some(ClientRef {
                id: "tenant2".to_string(),
            }),
        };
        let user = validator.validate_token(&generate_test_token(claims)).unwrap();
        assert!(user.email.is_empty());
        assert_eq!(resolve_tenant_id(&user.token), Ok("tenant2"));

        assert!(validator.validate_token("not-a-jwt").is_err());
    }

    #[test]
    fn test_validate_expired() {
        let validator = JwtTokenValidator::new_test();

        let claims = Claims {
            exp: current_timestamp() as usize - 3600,
            sub: "user1".to_string(),
            email: None,
            client_id: Some("tenant1".to_string()),
            client: None,
        };
        assert!(validator
            .validate_token(&generate_test_token(claims))
            .is_err());
    }

    #[test]
    fn test_invalid_key() {
        let invalid_key = "invalid key".as_bytes();
        assert!(JwtTokenValidator::new(invalid_key).is_err());
    }
}
