use crate::models::{NewNote, Note, NotePatch, User};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    /// Raw response body for non-2xx responses.
    pub body: Option<String>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
            body: None,
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
            body: None,
        }
    }

    fn unauthorized(body: String) -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: "Unauthorized".to_string(),
            body: Some(body),
        }
    }

    pub(crate) fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
            body: Some(body),
        }
    }

    /// The backend reports failures as `{"error": ..., "details": ...}`;
    /// `details` is the more specific of the two.
    pub(crate) fn server_message(&self) -> Option<String> {
        let body = self.body.as_deref()?;
        let data: serde_json::Value = serde_json::from_str(body).ok()?;
        server_message_from(&data, &["details", "error"])
    }
}

/// First non-empty value among `keys`, in order.
fn server_message_from(data: &serde_json::Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| {
        data.get(*k).and_then(|v| match v {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Null | serde_json::Value::String(_) => None,
            other => Some(other.to_string()),
        })
    })
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct ExchangeRequest {
    pub code: String,
    pub redirect_uri: String,
}

/// Response of `POST /auth/exchange`. Every field is optional on the wire; the
/// handoff page decides what counts as complete.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub(crate) struct ExchangeResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub provider_token: Option<String>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl ExchangeResponse {
    /// A 2xx without token/user explains itself in `error` first.
    pub(crate) fn server_message(&self) -> Option<String> {
        let data = serde_json::json!({
            "error": self.error,
            "details": self.details,
        });
        server_message_from(&data, &["error", "details"])
    }
}

/// Authorization-code exchange.
pub(crate) trait AuthApi {
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> ApiResult<ExchangeResponse>;
}

/// Note CRUD as consumed by the views.
pub(crate) trait NotesApi {
    async fn list_user_notes(&self, user_id: &str) -> ApiResult<Vec<Note>>;
    async fn get_note(&self, id: &str) -> ApiResult<Note>;
    async fn create_note(&self, note: &NewNote) -> ApiResult<Note>;
    async fn update_note(&self, id: &str, patch: &NotePatch) -> ApiResult<Note>;
    async fn delete_note(&self, id: &str) -> ApiResult<()>;
}

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    fn with_auth_headers(
        mut req: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        req
    }

    pub(crate) fn build_request(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> reqwest::RequestBuilder {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let mut req = client.request(method, url);
        req = Self::with_auth_headers(req, self.token.as_deref());

        if let Some(b) = body {
            req = req.json(b);
        }
        req
    }

    async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> ApiResult<reqwest::Response> {
        tracing::debug!(%method, path, "api request");
        let res = self
            .build_request(method, path, body)
            .send()
            .await
            .map_err(ApiError::network)?;

        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let body = res.text().await.unwrap_or_default();
        tracing::warn!(%status, path, "api request failed");
        if status.as_u16() == 401 {
            Err(ApiError::unauthorized(body))
        } else {
            Err(ApiError::http(status, body, "Request failed"))
        }
    }

    async fn request_api<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> ApiResult<T> {
        let res = self.send(method, path, body).await?;
        res.json().await.map_err(ApiError::parse)
    }

    async fn request_empty(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> ApiResult<()> {
        self.send(method, path, body).await.map(|_| ())
    }
}

fn note_path(id: &str) -> String {
    format!("/notes/{}", urlencoding::encode(id))
}

const NO_BODY: Option<&()> = None;

impl AuthApi for ApiClient {
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> ApiResult<ExchangeResponse> {
        self.request_api(
            reqwest::Method::POST,
            "/auth/exchange",
            Some(&ExchangeRequest {
                code: code.to_string(),
                redirect_uri: redirect_uri.to_string(),
            }),
        )
        .await
    }
}

impl NotesApi for ApiClient {
    async fn list_user_notes(&self, user_id: &str) -> ApiResult<Vec<Note>> {
        let path = format!("/notes/user/{}", urlencoding::encode(user_id));
        self.request_api(reqwest::Method::GET, &path, NO_BODY).await
    }

    async fn get_note(&self, id: &str) -> ApiResult<Note> {
        self.request_api(reqwest::Method::GET, &note_path(id), NO_BODY)
            .await
    }

    async fn create_note(&self, note: &NewNote) -> ApiResult<Note> {
        self.request_api(reqwest::Method::POST, "/notes", Some(note))
            .await
    }

    async fn update_note(&self, id: &str, patch: &NotePatch) -> ApiResult<Note> {
        self.request_api(reqwest::Method::PUT, &note_path(id), Some(patch))
            .await
    }

    async fn delete_note(&self, id: &str) -> ApiResult<()> {
        self.request_empty(reqwest::Method::DELETE, &note_path(id), NO_BODY)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Visibility;

    fn built(client: &ApiClient, method: reqwest::Method, path: &str) -> reqwest::Request {
        client
            .build_request(method, path, NO_BODY)
            .build()
            .expect("request should build")
    }

    #[test]
    fn test_api_client_new_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:8080/".to_string());
        assert_eq!(client.base_url, "http://localhost:8080");
        assert!(client.token.is_none());
    }

    #[test]
    fn test_request_without_token_omits_authorization() {
        let client = ApiClient::new("http://localhost:8080".to_string());
        let req = built(&client, reqwest::Method::GET, "/notes/1");
        assert!(req.headers().get("Authorization").is_none());
    }

    #[test]
    fn test_request_with_token_attaches_bearer() {
        let client =
            ApiClient::new("http://localhost:8080".to_string()).with_token(Some("jwt".into()));
        let req = built(&client, reqwest::Method::GET, "/notes/user/9");
        assert_eq!(
            req.headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok()),
            Some("Bearer jwt")
        );
        assert_eq!(req.url().as_str(), "http://localhost:8080/notes/user/9");
    }

    #[test]
    fn test_blank_token_is_treated_as_absent() {
        let client =
            ApiClient::new("http://localhost:8080".to_string()).with_token(Some("  ".into()));
        assert!(client.token.is_none());
    }

    #[test]
    fn test_delete_request_targets_note_path() {
        let client = ApiClient::new("http://api".to_string()).with_token(Some("t".into()));
        let req = built(&client, reqwest::Method::DELETE, &note_path("abc"));
        assert_eq!(req.method(), reqwest::Method::DELETE);
        assert_eq!(req.url().path(), "/notes/abc");
    }

    #[test]
    fn test_create_request_carries_json_body() {
        let client = ApiClient::new("http://api".to_string());
        let body = NewNote {
            title: "Groceries".to_string(),
            content: "milk\neggs".to_string(),
            visibility: Visibility::Private,
            server_id: 0,
            channel_id: 0,
            alert_at: None,
        };
        let req = client
            .build_request(reqwest::Method::POST, "/notes", Some(&body))
            .build()
            .expect("request should build");
        let bytes = req
            .body()
            .and_then(|b| b.as_bytes())
            .expect("json body should be buffered");
        let v: serde_json::Value = serde_json::from_slice(bytes).expect("valid json");
        assert_eq!(v["title"], "Groceries");
        assert_eq!(v["content"], "milk\neggs");
    }

    #[test]
    fn test_exchange_response_contract_deserialize() {
        let json = r#"{
            "token": "jwt-token",
            "user": {"id": "1", "username": "u", "discriminator": "0", "avatar": null},
            "provider_token": "discord-access"
        }"#;
        let parsed: ExchangeResponse =
            serde_json::from_str(json).expect("exchange response should parse");
        assert_eq!(parsed.token.as_deref(), Some("jwt-token"));
        assert_eq!(parsed.user.map(|u| u.username), Some("u".to_string()));
        assert_eq!(parsed.provider_token.as_deref(), Some("discord-access"));
    }

    #[test]
    fn test_exchange_response_missing_fields_parses() {
        let parsed: ExchangeResponse =
            serde_json::from_str(r#"{"error": "Token exchange failed"}"#).expect("should parse");
        assert!(parsed.token.is_none());
        assert!(parsed.user.is_none());
        assert_eq!(parsed.server_message().as_deref(), Some("Token exchange failed"));
    }

    #[test]
    fn test_exchange_response_message_prefers_error() {
        let parsed: ExchangeResponse = serde_json::from_str(
            r#"{"error": "Missing id in Discord user info", "details": "raw provider body"}"#,
        )
        .expect("should parse");
        assert_eq!(
            parsed.server_message().as_deref(),
            Some("Missing id in Discord user info")
        );

        let only_details: ExchangeResponse =
            serde_json::from_str(r#"{"details": "raw provider body"}"#).expect("should parse");
        assert_eq!(only_details.server_message().as_deref(), Some("raw provider body"));
    }

    #[test]
    fn test_server_message_prefers_details() {
        let e = ApiError::http(
            reqwest::StatusCode::BAD_GATEWAY,
            r#"{"error": "Token exchange failed", "details": "invalid_grant"}"#.to_string(),
            "Request failed",
        );
        assert_eq!(e.kind, ApiErrorKind::Http);
        assert_eq!(e.server_message().as_deref(), Some("invalid_grant"));
    }

    #[test]
    fn test_server_message_absent_for_plain_text_body() {
        let e = ApiError::http(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            "boom".to_string(),
            "Request failed",
        );
        assert!(e.server_message().is_none());
    }
}
