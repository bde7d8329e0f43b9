use crate::domain_port::HttpMethod;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("failed to get session: {0}")]
    SessionUnavailable(String),
    #[error("request failed: {0}")]
    TransportFailure(String),
    #[error("request failed with status {status}: {message}")]
    HttpError { status: u16, message: String },
    #[error("failed to refresh session: {0}")]
    AuthRefreshFailure(String),
    #[error("request failed after session refresh: {message}")]
    RetryFailure { status: Option<u16>, message: String },
}

impl ApiError {
    /// HTTP status behind the error, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpError { status, .. } => Some(*status),
            ApiError::RetryFailure { status, .. } => *status,
            _ => None,
        }
    }
}

/// One call against the catalog API, relative to the client's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn with_query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    /// Sends the request and returns the decoded response body.
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError>;
}
