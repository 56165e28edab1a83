pub mod member;
pub mod permission;
pub mod team;
pub mod workspace;

use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const HEALTHZ_PATH: &str = "/healthz";

pub const HEADER_AUTHORIZATION: &str = "Authorization";

/// A scalar value bound to a SQL statement or query string.
#[derive(Debug, Clone)]
pub enum Value {
    Text(String),
    Integer(u64),
    Bool(bool),
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Text(text) => write!(f, "{text}"),
            Value::Integer(integer) => write!(f, "{integer}"),
            Value::Bool(boolean) => write!(f, "{boolean}"),
        }
    }
}

/// Query conditions for listing resources.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Query {
    /// Query offset for pagination
    pub offset: Option<u64>,

    /// Maximum number of items to return
    pub limit: Option<u64>,

    /// Fuzzy search condition. The specific field to search depends on
    /// resource type (usually the name).
    pub search: Option<String>,

    /// Restrict results to records owned by this user. Set by the server
    /// from the authenticated identity, never trusted from the caller.
    #[serde(skip)]
    pub owner: Option<String>,
}

/// Common response structure for API calls that don't return data.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommonResponse {
    pub code: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response structure for API calls that return data.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound = "T: Serialize + DeserializeOwned")]
pub struct ResourceResponse<T: Serialize + DeserializeOwned> {
    pub code: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub data: Option<T>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(bound = "T: Serialize + DeserializeOwned")]
pub struct ListResponse<T: Serialize + DeserializeOwned> {
    pub items: Vec<T>,
    pub total: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub version: String,
    pub timestamp: u64,
}
