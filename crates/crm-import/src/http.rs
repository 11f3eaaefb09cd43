//! [`CrmBackend`] over the CRM's REST API.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::debug;

use crm_model::{
    AutoRegisterRequest, BackendError, CrmBackend, CustomFieldDefinition, ImportBatchResult,
    ImportRecord, NewCustomField, Result, TargetEntity,
};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking HTTP client for the CRM endpoints.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn prepare(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder
            .header(
                USER_AGENT,
                concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
            )
            .header(ACCEPT, "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = self
            .prepare(builder)
            .send()
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "response received");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(error_for_status(status, &body))
    }

    fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        self.send(builder)?
            .json()
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

impl CrmBackend for HttpBackend {
    fn bulk_upsert(&self, records: &[ImportRecord]) -> Result<ImportBatchResult> {
        debug!(rows = records.len(), "bulk upsert");
        self.send_json(
            self.client
                .post(self.url("contacts/bulk-upsert"))
                .json(records),
        )
    }

    fn list_custom_fields(
        &self,
        entity: Option<TargetEntity>,
    ) -> Result<Vec<CustomFieldDefinition>> {
        let url = match entity {
            Some(entity) => format!("{}?entityType={}", self.url("custom-fields"), entity),
            None => self.url("custom-fields"),
        };
        let definitions: Vec<CustomFieldDefinition> = self.send_json(self.client.get(url))?;
        Ok(definitions
            .into_iter()
            .filter(|d| d.active && entity.is_none_or(|e| d.entity_type == e))
            .collect())
    }

    fn create_custom_field(&self, field: &NewCustomField) -> Result<CustomFieldDefinition> {
        self.send_json(self.client.post(self.url("custom-fields")).json(field))
    }

    fn auto_register_custom_fields(&self, request: &AutoRegisterRequest) -> Result<()> {
        self.send(
            self.client
                .post(self.url("custom-fields/auto-register"))
                .json(request),
        )?;
        Ok(())
    }
}

/// Maps a non-success response to a backend error.
///
/// 409 means the key already exists. The message is taken from a JSON
/// `message` or `error` field, then the raw body, then the status reason.
fn error_for_status(status: StatusCode, body: &str) -> BackendError {
    let message = error_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    });
    if status == StatusCode::CONFLICT {
        BackendError::Duplicate { message }
    } else {
        BackendError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(serde_json::Value::String(message)) = map.get(key)
                && !message.trim().is_empty()
            {
                return Some(message.clone());
            }
        }
    }
    Some(body.to_string())
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread::{self, JoinHandle};

    use crm_model::{EntityPayload, FieldType};

    use super::*;

    /// Answers one request with `status` and a JSON `body`, then hands back
    /// the raw request text.
    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).expect("write response");
            request
        });
        (format!("http://{addr}/api"), handle)
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).expect("read request");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn contact(email: &str) -> ImportRecord {
        let mut contact = EntityPayload::default();
        contact.fields.insert("email".to_string(), email.to_string());
        ImportRecord {
            contact,
            account: None,
        }
    }

    #[test]
    fn bulk_upsert_reads_batch_counts() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"success":2,"created":1,"updated":1,"failed":1,
                "errors":[{"index":2,"error":"Invalid email"}]}"#,
        );
        let backend = HttpBackend::new(base_url, DEFAULT_TIMEOUT)
            .expect("build client")
            .with_token("secret");

        let result = backend
            .bulk_upsert(&[contact("a@acme.com"), contact("b@acme.com"), contact("c@")])
            .expect("bulk upsert");
        assert_eq!(result.success, 2);
        assert_eq!(result.created, 1);
        assert_eq!(result.updated, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(result.errors[0].index, 2);

        let request = server.join().expect("server thread").to_lowercase();
        assert!(request.starts_with("post /api/contacts/bulk-upsert "));
        assert!(request.contains("authorization: bearer secret"));
        assert!(request.contains(r#"{"contact":{"email":"a@acme.com"}}"#));
    }

    #[test]
    fn list_custom_fields_filters_by_entity_and_activity() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"[
                {"entityType":"account","fieldKey":"tier","displayLabel":"Tier",
                 "fieldType":"date","active":true,"isRequired":false},
                {"entityType":"account","fieldKey":"legacy","displayLabel":"Legacy",
                 "active":false},
                {"entityType":"contact","fieldKey":"score","displayLabel":"Score"}
            ]"#,
        );
        let backend = HttpBackend::new(base_url, DEFAULT_TIMEOUT).expect("build client");

        let definitions = backend
            .list_custom_fields(Some(TargetEntity::Account))
            .expect("list fields");
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].field_key, "tier");
        assert_eq!(definitions[0].field_type, FieldType::Date);

        let request = server.join().expect("server thread");
        assert!(request.starts_with("GET /api/custom-fields?entityType=account "));
    }

    #[test]
    fn create_custom_field_returns_the_stored_definition() {
        let (base_url, server) = serve_once(
            "201 Created",
            r#"{"entityType":"contact","fieldKey":"lead_score","displayLabel":"Lead Score",
                "fieldType":"number","active":true,"isRequired":false}"#,
        );
        let backend = HttpBackend::new(base_url, DEFAULT_TIMEOUT).expect("build client");

        let created = backend
            .create_custom_field(&NewCustomField::new(
                TargetEntity::Contact,
                "lead_score",
                "Lead Score",
                FieldType::Number,
            ))
            .expect("create field");
        assert_eq!(created.catalog_key(), "custom_lead_score");
        assert_eq!(created.field_type, FieldType::Number);

        let request = server.join().expect("server thread");
        assert!(request.starts_with("POST /api/custom-fields "));
        assert!(request.contains(r#""fieldKey":"lead_score""#));
    }

    #[test]
    fn conflict_over_the_wire_is_duplicate() {
        let (base_url, server) = serve_once(
            "409 Conflict",
            r#"{"message":"Field key 'tier' already exists"}"#,
        );
        let backend = HttpBackend::new(base_url, DEFAULT_TIMEOUT).expect("build client");

        let error = backend
            .create_custom_field(&NewCustomField::new(
                TargetEntity::Account,
                "tier",
                "Tier",
                FieldType::Text,
            ))
            .expect_err("duplicate key");
        assert_eq!(
            error,
            BackendError::Duplicate {
                message: "Field key 'tier' already exists".to_string()
            }
        );
        server.join().expect("server thread");
    }

    #[test]
    fn conflict_is_duplicate_with_server_message() {
        let error = error_for_status(
            StatusCode::CONFLICT,
            r#"{"message":"Field key 'tier' already exists for account"}"#,
        );
        assert_eq!(
            error,
            BackendError::Duplicate {
                message: "Field key 'tier' already exists for account".to_string()
            }
        );
        assert_eq!(
            error.user_message(),
            "Field key 'tier' already exists for account"
        );
    }

    #[test]
    fn other_statuses_are_rejected() {
        let error = error_for_status(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(
            error,
            BackendError::Rejected {
                status: 502,
                message: "upstream down".to_string()
            }
        );
        assert!(error.is_retryable());
    }

    #[test]
    fn message_falls_back_through_error_field_and_reason() {
        assert_eq!(
            error_message(r#"{"error":"Invalid payload"}"#).as_deref(),
            Some("Invalid payload")
        );
        let error = error_for_status(StatusCode::UNAUTHORIZED, "  ");
        assert_eq!(error.user_message(), "Unauthorized");
    }

    #[test]
    fn urls_join_without_double_slashes() {
        let backend = HttpBackend::new("https://crm.example.com/api/", DEFAULT_TIMEOUT)
            .expect("build client");
        assert_eq!(
            backend.url("/contacts/bulk-upsert"),
            "https://crm.example.com/api/contacts/bulk-upsert"
        );
    }
}
