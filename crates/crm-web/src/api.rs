//! Document store client for the browser
//!
//! Every response passes the auth interceptor before it is decoded, and the
//! session is read through the store on each request.

use async_trait::async_trait;
use crm_core::api::{decode_list, decode_record, list_url, logged_user_url, record_url, server_message};
use crm_core::{ApiResponse, AuthInterceptor, CoreError, EntityKind, EntityRecord, RecordFetcher, SessionStore};
use gloo_net::http::Request;
use url::Url;
use web_sys::RequestCredentials;

/// Rows requested for a list view
pub const LIST_PAGE_LENGTH: usize = 50;

/// `gloo-net` record fetcher
#[derive(Debug, Clone)]
pub struct GlooFetcher {
    base: String,
    interceptor: AuthInterceptor,
    session: SessionStore,
}

impl GlooFetcher {
    pub fn new(base: impl Into<String>, interceptor: AuthInterceptor, session: SessionStore) -> Self {
        Self {
            base: base.into(),
            interceptor,
            session,
        }
    }

    async fn get(&self, url: &Url) -> Result<ApiResponse, CoreError> {
        let mut request = Request::get(url.as_str())
            .credentials(RequestCredentials::Include)
            .header("Accept", "application/json");
        if let Some(authorization) = self.session.authorization_header() {
            request = request.header("Authorization", &authorization);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.interceptor.intercept_transport_error(e))?;
        let response = read_response(response).await?;
        self.interceptor.intercept(response)
    }

    /// First page of a kind's list
    pub async fn fetch_list(&self, kind: EntityKind) -> Result<Vec<EntityRecord>, CoreError> {
        let url = list_url(&self.base, kind, LIST_PAGE_LENGTH)?;
        let response = self.get(&url).await?;
        decode_list(kind, &response)
    }
}

#[async_trait(?Send)]
impl RecordFetcher for GlooFetcher {
    async fn fetch_record(&self, kind: EntityKind, id: &str) -> Result<EntityRecord, CoreError> {
        let url = record_url(&self.base, kind, id)?;
        let response = self.get(&url).await?;
        decode_record(kind, id, &response)
    }
}

async fn read_response(response: gloo_net::http::Response) -> Result<ApiResponse, CoreError> {
    let status = response.status();
    let content_type = response.headers().get("content-type");
    let body = response
        .text()
        .await
        .map_err(|e| CoreError::network(format!("reading response body: {e}")))?;
    Ok(ApiResponse::new(status, content_type, body))
}

/// Ask the document store who the credentials belong to.
///
/// Used by the login form before anything is stored. Does not go through the
/// interceptor: a rejected login is not an expired session.
pub async fn verify_credentials(base: &str, authorization: &str) -> Result<String, CoreError> {
    let url = logged_user_url(base)?;
    let response = Request::get(url.as_str())
        .header("Accept", "application/json")
        .header("Authorization", authorization)
        .send()
        .await
        .map_err(|e| CoreError::network(e.to_string()))?;
    let response = read_response(response).await?;

    let body = response.json_body();
    if !response.is_success() {
        let message = body
            .as_ref()
            .and_then(server_message)
            .unwrap_or_else(|| format!("login rejected ({})", response.status));
        return Err(CoreError::Http {
            status: response.status,
            message,
        });
    }

    body.as_ref()
        .and_then(server_message)
        .ok_or_else(|| CoreError::decode("logged-user response carries no user"))
}
