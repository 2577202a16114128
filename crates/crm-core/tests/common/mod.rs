//! Shared fixtures for crm-core integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use crm_core::api::decode_record;
use crm_core::models::{Credentials, Identity};
use crm_core::{
    ApiResponse, AuthInterceptor, Console, ConsoleConfig, CoreError, EntityKind, EntityRecord,
    MemoryHistory, MemoryStorage, RecordFetcher, Session, SessionStore,
};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

/// Fetcher answering from canned responses, routed through the interceptor
pub struct ScriptedFetcher {
    interceptor: AuthInterceptor,
    session: SessionStore,
    responses: Mutex<HashMap<(EntityKind, String), ApiResponse>>,
    /// Authorization header seen on each request
    pub seen_auth: Mutex<Vec<Option<String>>>,
}

impl ScriptedFetcher {
    pub fn new(interceptor: AuthInterceptor, session: SessionStore) -> Self {
        Self {
            interceptor,
            session,
            responses: Mutex::new(HashMap::new()),
            seen_auth: Mutex::new(Vec::new()),
        }
    }

    pub fn record(&self, kind: EntityKind, id: &str) {
        self.responses.lock().insert(
            (kind, id.to_string()),
            ApiResponse::json(200, &json!({"data": {"name": id, "status": "Open"}})),
        );
    }

    pub fn respond(&self, kind: EntityKind, id: &str, response: ApiResponse) {
        self.responses.lock().insert((kind, id.to_string()), response);
    }

    pub fn session_expired(&self, kind: EntityKind, id: &str) {
        self.respond(
            kind,
            id,
            ApiResponse::json(
                401,
                &json!({
                    "exc_type": "AuthenticationError",
                    "message": "Session expired, please log in again"
                }),
            ),
        );
    }
}

#[async_trait(?Send)]
impl RecordFetcher for ScriptedFetcher {
    async fn fetch_record(&self, kind: EntityKind, id: &str) -> Result<EntityRecord, CoreError> {
        self.seen_auth.lock().push(self.session.authorization_header());
        let response = self
            .responses
            .lock()
            .get(&(kind, id.to_string()))
            .cloned()
            .unwrap_or_else(|| {
                ApiResponse::json(404, &json!({"exc_type": "DoesNotExistError"}))
            });
        let response = self.interceptor.intercept(response)?;
        decode_record(kind, id, &response)
    }
}

/// Any id of any kind exists
pub struct EverythingExists;

#[async_trait(?Send)]
impl RecordFetcher for EverythingExists {
    async fn fetch_record(&self, _kind: EntityKind, id: &str) -> Result<EntityRecord, CoreError> {
        Ok(EntityRecord::new(id))
    }
}

pub struct Fixture {
    pub console: Console,
    pub history: Arc<MemoryHistory>,
    pub storage: Arc<MemoryStorage>,
    pub fetcher: Arc<ScriptedFetcher>,
}

pub fn session() -> Session {
    Session::new(
        "ACME",
        Identity {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            full_name: "Ada Lovelace".to_string(),
        },
        Credentials::ApiKey {
            key: "key".to_string(),
            secret: "secret".to_string(),
        },
    )
}

/// A logged-in console opened at `path`
pub fn fixture(path: &str) -> Fixture {
    let history = Arc::new(MemoryHistory::new(path));
    let storage = Arc::new(MemoryStorage::new());
    let mut handle = None;

    let console = Console::new(
        ConsoleConfig::default(),
        history.clone(),
        storage.clone(),
        |interceptor, session| {
            let fetcher = Arc::new(ScriptedFetcher::new(interceptor, session));
            handle = Some(fetcher.clone());
            fetcher as Arc<dyn RecordFetcher>
        },
    );
    console.session.set(&session()).unwrap();

    Fixture {
        console,
        history,
        storage,
        fetcher: handle.expect("fetcher is built during wiring"),
    }
}
