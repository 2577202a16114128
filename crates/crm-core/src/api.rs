//! Remote document API contract
//!
//! Transport-agnostic pieces shared by the browser and CLI fetchers: the
//! response shape handed to the interceptor, URL building and record decoding.

use crate::error::CoreError;
use crate::models::{EntityKind, EntityRecord};
use async_trait::async_trait;
use serde_json::Value;
use url::Url;

/// Fetches a single record by kind and id.
///
/// Implementations route every response through the
/// [`AuthInterceptor`](crate::auth::AuthInterceptor) before decoding it.
#[async_trait(?Send)]
pub trait RecordFetcher: Send + Sync {
    async fn fetch_record(&self, kind: EntityKind, id: &str) -> Result<EntityRecord, CoreError>;
}

/// A raw HTTP response as seen by the interceptor
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, content_type: Option<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    /// JSON response helper, mostly for tests and fakes
    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, Some("application/json".to_string()), body.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains("json"))
            .unwrap_or(false)
    }

    /// Body parsed as JSON when the content type says so
    pub fn json_body(&self) -> Option<Value> {
        if !self.is_json() {
            return None;
        }
        serde_json::from_str(&self.body).ok()
    }
}

/// `{base}/api/resource/{doctype}/{id}` with each segment encoded
pub fn record_url(base: &str, kind: EntityKind, id: &str) -> Result<Url, CoreError> {
    let mut url = Url::parse(base)
        .map_err(|e| CoreError::invalid_config(format!("api base url {base:?}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| CoreError::invalid_config(format!("api base url {base:?} cannot be a base")))?
        .pop_if_empty()
        .extend(["api", "resource", kind.doctype(), id]);
    Ok(url)
}

/// `{base}/api/resource/{doctype}` asking for every field of the first `limit` rows
pub fn list_url(base: &str, kind: EntityKind, limit: usize) -> Result<Url, CoreError> {
    let mut url = Url::parse(base)
        .map_err(|e| CoreError::invalid_config(format!("api base url {base:?}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| CoreError::invalid_config(format!("api base url {base:?} cannot be a base")))?
        .pop_if_empty()
        .extend(["api", "resource", kind.doctype()]);
    url.query_pairs_mut()
        .append_pair("fields", "[\"*\"]")
        .append_pair("limit_page_length", &limit.to_string());
    Ok(url)
}

/// Endpoint returning the user bound to the presented credentials
pub fn logged_user_url(base: &str) -> Result<Url, CoreError> {
    let mut url = Url::parse(base)
        .map_err(|e| CoreError::invalid_config(format!("api base url {base:?}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| CoreError::invalid_config(format!("api base url {base:?} cannot be a base")))?
        .pop_if_empty()
        .extend(["api", "method", "frappe.auth.get_logged_user"]);
    Ok(url)
}

/// Human-readable message carried by an error payload, if any
pub fn server_message(body: &Value) -> Option<String> {
    if let Some(message) = body.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }
    // `_server_messages` is a JSON-encoded list of JSON-encoded objects
    if let Some(raw) = body.get("_server_messages").and_then(Value::as_str) {
        let first = serde_json::from_str::<Vec<String>>(raw)
            .ok()
            .and_then(|list| list.into_iter().next());
        if let Some(entry) = first {
            let message = serde_json::from_str::<Value>(&entry)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(entry);
            return Some(message);
        }
    }
    body.get("exception")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Decode a record response that already passed the interceptor
pub fn decode_record(kind: EntityKind, id: &str, response: &ApiResponse) -> Result<EntityRecord, CoreError> {
    if response.status == 404 {
        return Err(CoreError::RecordNotFound {
            kind,
            id: id.to_string(),
        });
    }

    let body = response.json_body();

    if !response.is_success() {
        let message = body
            .as_ref()
            .and_then(server_message)
            .unwrap_or_else(|| format!("request for {kind} {id} failed"));
        return Err(CoreError::Http {
            status: response.status,
            message,
        });
    }

    let body = body.ok_or_else(|| CoreError::decode("expected a JSON body"))?;
    let payload = match body {
        Value::Object(mut map) if map.get("data").map(Value::is_object).unwrap_or(false) => {
            map.remove("data").unwrap_or_default()
        }
        other => other,
    };

    serde_json::from_value(payload).map_err(|e| CoreError::decode(format!("{kind} {id}: {e}")))
}

/// Decode a list response that already passed the interceptor
pub fn decode_list(kind: EntityKind, response: &ApiResponse) -> Result<Vec<EntityRecord>, CoreError> {
    let body = response.json_body();

    if !response.is_success() {
        let message = body
            .as_ref()
            .and_then(server_message)
            .unwrap_or_else(|| format!("listing {} failed", kind.plural()));
        return Err(CoreError::Http {
            status: response.status,
            message,
        });
    }

    let mut body = body.ok_or_else(|| CoreError::decode("expected a JSON body"))?;
    let rows = match body.get_mut("data").map(Value::take) {
        Some(rows @ Value::Array(_)) => rows,
        _ => return Err(CoreError::decode(format!("{} list: missing data array", kind.plural()))),
    };

    serde_json::from_value(rows).map_err(|e| CoreError::decode(format!("{} list: {e}", kind.plural())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_url_encodes_segments() {
        let url = record_url("https://crm.example.com", EntityKind::Deal, "D 100").unwrap();
        assert_eq!(
            url.as_str(),
            "https://crm.example.com/api/resource/CRM%20Deal/D%20100"
        );

        let url = record_url("https://crm.example.com/erp/", EntityKind::User, "a@b.c").unwrap();
        assert_eq!(url.as_str(), "https://crm.example.com/erp/api/resource/User/a@b.c");
    }

    #[test]
    fn test_record_url_rejects_relative_base() {
        assert!(matches!(
            record_url("/api", EntityKind::Lead, "L-1"),
            Err(CoreError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_list_url_carries_query() {
        let url = list_url("https://crm.example.com", EntityKind::Lead, 20).unwrap();
        assert_eq!(url.path(), "/api/resource/CRM%20Lead");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("fields".to_string(), "[\"*\"]".to_string()),
                ("limit_page_length".to_string(), "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_decode_list() {
        let response = ApiResponse::json(
            200,
            &json!({"data": [{"name": "L-1", "status": "New"}, {"name": "L-2"}]}),
        );
        let records = decode_list(EntityKind::Lead, &response).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, "L-2");

        let response = ApiResponse::json(200, &json!({"message": "ok"}));
        assert!(matches!(
            decode_list(EntityKind::Lead, &response),
            Err(CoreError::Decode { .. })
        ));
    }

    #[test]
    fn test_decode_wrapped_record() {
        let response = ApiResponse::json(
            200,
            &json!({"data": {"name": "D-100", "deal_status": "Qualification"}}),
        );
        let record = decode_record(EntityKind::Deal, "D-100", &response).unwrap();
        assert_eq!(record.id, "D-100");
        assert_eq!(record.field("deal_status"), Some(&json!("Qualification")));
    }

    #[test]
    fn test_decode_not_found_and_http_errors() {
        let response = ApiResponse::json(404, &json!({"exc_type": "DoesNotExistError"}));
        assert!(matches!(
            decode_record(EntityKind::Deal, "nope", &response),
            Err(CoreError::RecordNotFound { .. })
        ));

        let response = ApiResponse::json(
            417,
            &json!({"_server_messages": "[\"{\\\"message\\\": \\\"Not permitted\\\"}\"]"}),
        );
        assert_eq!(
            decode_record(EntityKind::Lead, "L-1", &response),
            Err(CoreError::Http {
                status: 417,
                message: "Not permitted".to_string()
            })
        );
    }

    #[test]
    fn test_decode_rejects_non_json_success() {
        let response = ApiResponse::new(200, Some("text/html".to_string()), "<html></html>");
        assert!(matches!(
            decode_record(EntityKind::Lead, "L-1", &response),
            Err(CoreError::Decode { .. })
        ));
    }
}
