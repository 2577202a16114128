//! Authenticated session data

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who is logged in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub email: String,
    pub full_name: String,
}

/// Credential material presented with every request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Credentials {
    /// Cookie session id issued by the document store's login endpoint
    SessionId { sid: String },
    /// API key/secret pair
    ApiKey { key: String, secret: String },
}

/// Role profile assigned to the user
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoleProfile {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// The live session of this browser context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub company_id: String,
    pub identity: Identity,
    pub credentials: Credentials,
    #[serde(default)]
    pub role_profile: RoleProfile,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(company_id: impl Into<String>, identity: Identity, credentials: Credentials) -> Self {
        Self {
            company_id: company_id.into(),
            identity,
            credentials,
            role_profile: RoleProfile::default(),
            created_at: Utc::now(),
        }
    }

    pub fn with_role_profile(mut self, role_profile: RoleProfile) -> Self {
        self.role_profile = role_profile;
        self
    }

    /// `Authorization` header value for key/secret credentials.
    ///
    /// Cookie sessions return `None`: the browser sends the `sid` cookie itself.
    pub fn authorization_header(&self) -> Option<String> {
        match &self.credentials {
            Credentials::ApiKey { key, secret } => Some(format!("token {key}:{secret}")),
            Credentials::SessionId { .. } => None,
        }
    }

    /// `Cookie` header value for clients without a cookie jar
    pub fn cookie_header(&self) -> Option<String> {
        match &self.credentials {
            Credentials::SessionId { sid } => Some(format!("sid={sid}")),
            Credentials::ApiKey { .. } => None,
        }
    }
}
