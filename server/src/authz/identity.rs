use serde::{Deserialize, Serialize};

use super::Denial;

/// Tenant-identifying claims carried by an authenticated session's access
/// token. The issuing OAuth provider either embeds the client id directly
/// or nests it under the registered client relation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRef {
    pub id: String,
}

/// Extracts the tenant (client) identifier from an access token.
///
/// Precedence is fixed: the direct `client_id` field first, then the
/// nested `client.id` relation. Empty strings count as absent. Failure
/// short-circuits every downstream authorization check.
pub fn resolve_tenant_id(token: &AccessToken) -> Result<&str, Denial> {
    if let Some(id) = token.client_id.as_deref() {
        if !id.is_empty() {
            return Ok(id);
        }
    }
    if let Some(client) = token.client.as_ref() {
        if !client.id.is_empty() {
            return Ok(&client.id);
        }
    }
    Err(Denial::MissingContext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_tenant_id() {
        // Direct field wins
        let token = AccessToken {
            client_id: Some("tenant1".to_string()),
            client: Some(ClientRef {
                id: "tenant2".to_string(),
            }),
        };
        assert_eq!(resolve_tenant_id(&token), Ok("tenant1"));

        // Fallback to the nested relation
        let token = AccessToken {
            client_id: None,
            client: Some(ClientRef {
                id: "tenant2".to_string(),
            }),
        };
        assert_eq!(resolve_tenant_id(&token), Ok("tenant2"));

        // Empty direct field counts as absent
        let token = AccessToken {
            client_id: Some(String::new()),
            client: Some(ClientRef {
                id: "tenant2".to_string(),
            }),
        };
        assert_eq!(resolve_tenant_id(&token), Ok("tenant2"));

        // Neither source present
        let token = AccessToken::default();
        assert_eq!(resolve_tenant_id(&token), Err(Denial::MissingContext));

        // Both empty
        let token = AccessToken {
            client_id: Some(String::new()),
            client: Some(ClientRef { id: String::new() }),
        };
        assert_eq!(resolve_tenant_id(&token), Err(Denial::MissingContext));
    }
}
