//! reqwest-backed document store client

use async_trait::async_trait;
use crm_core::api::{decode_record, logged_user_url, record_url, server_message};
use crm_core::{
    ApiResponse, AuthInterceptor, CoreError, EntityKind, EntityRecord, RecordFetcher, Session,
    SessionStore,
};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, COOKIE};
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

fn client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("crm-console/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
}

/// Attach the session's credentials; a CLI has no cookie jar, so the sid goes
/// in an explicit `Cookie` header.
fn authorize(request: RequestBuilder, session: Option<&Session>) -> RequestBuilder {
    let Some(session) = session else {
        return request;
    };
    let request = match session.authorization_header() {
        Some(value) => request.header(AUTHORIZATION, value),
        None => request,
    };
    match session.cookie_header() {
        Some(value) => request.header(COOKIE, value),
        None => request,
    }
}

async fn read_response(response: Response) -> Result<ApiResponse, CoreError> {
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response
        .text()
        .await
        .map_err(|e| CoreError::network(format!("reading response body: {e}")))?;
    Ok(ApiResponse::new(status, content_type, body))
}

/// Record fetcher used by `crm-console resolve`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base: String,
    interceptor: AuthInterceptor,
    session: SessionStore,
}

impl HttpFetcher {
    pub fn new(
        base: impl Into<String>,
        interceptor: AuthInterceptor,
        session: SessionStore,
    ) -> Self {
        Self {
            client: client(),
            base: base.into(),
            interceptor,
            session,
        }
    }
}

#[async_trait(?Send)]
impl RecordFetcher for HttpFetcher {
    async fn fetch_record(&self, kind: EntityKind, id: &str) -> Result<EntityRecord, CoreError> {
        let url = record_url(&self.base, kind, id)?;
        debug!(url = %url, "Fetching record");

        let session = self.session.get();
        let request = authorize(
            self.client.get(url).header(ACCEPT, "application/json"),
            session.as_ref(),
        );
        let response = request
            .send()
            .await
            .map_err(|e| self.interceptor.intercept_transport_error(e))?;
        let response = self.interceptor.intercept(read_response(response).await?)?;
        decode_record(kind, id, &response)
    }
}

/// User the session's credentials belong to; used by `login` before storing
pub async fn logged_user(base: &str, session: &Session) -> Result<String, CoreError> {
    let url = logged_user_url(base)?;
    let request = authorize(
        client().get(url).header(ACCEPT, "application/json"),
        Some(session),
    );
    let response = request
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
