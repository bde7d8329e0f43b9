use crate::application_port::{ApiClient, ApiError, ApiRequest};
use crate::domain_model::{AccessToken, Session};
use crate::domain_port::{
    HttpMethod, HttpTransport, SessionError, SessionProvider, TransportRequest, TransportResponse,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

const AUTHORIZATION: &str = "Authorization";
const CONTENT_TYPE: &str = "Content-Type";
const JSON_CONTENT_TYPE: &str = "application/json";
const UNAUTHORIZED: u16 = 401;

/// HTTP client for the catalog API.
///
/// Every request carries the current access token as a bearer credential.
/// A 401 answer triggers exactly one session refresh followed by exactly one
/// resend of the original request; whatever the resend yields is final.
pub struct AuthenticatedApiClient {
    base_url: String,
    sessions: Arc<dyn SessionProvider>,
    transport: Arc<dyn HttpTransport>,
}

impl AuthenticatedApiClient {
    pub fn new(
        base_url: impl Into<String>,
        sessions: Arc<dyn SessionProvider>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            sessions,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<Value>,
        headers: Option<Vec<(String, String)>>,
    ) -> Result<Value, ApiError> {
        let mut request = ApiRequest::new(method, path);
        request.body = payload;
        request.headers = headers.unwrap_or_default();
        self.execute(request).await
    }

    async fn execute(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let session = match self.sessions.current_session().await {
            Ok(Some(session)) => session,
            Ok(None) => {
                return Err(ApiError::SessionUnavailable(SessionError::NoUser.to_string()));
            }
            Err(e) => return Err(ApiError::SessionUnavailable(e.to_string())),
        };

        let mut outbound = self.prepare(request);
        attach_bearer(&mut outbound, session.access_token.as_ref());

        debug!(method = %outbound.method, url = %outbound.url, "sending request");
        let response = self
            .transport
            .send(&outbound)
            .await
            .map_err(|e| ApiError::TransportFailure(e.to_string()))?;

        if response.is_success() {
            return Ok(decode_body(&response.body));
        }
        if response.status == UNAUTHORIZED {
            debug!(url = %outbound.url, "access token rejected, refreshing session");
            return self.refresh_and_resend(outbound).await;
        }
        Err(ApiError::HttpError {
            status: response.status,
            message: error_message(&response),
        })
    }

    async fn refresh_and_resend(&self, mut outbound: TransportRequest) -> Result<Value, ApiError> {
        self.sessions
            .refresh_session()
            .await
            .map_err(|e| ApiError::AuthRefreshFailure(e.to_string()))?;

        // The refreshed token is re-read from the provider rather than taken
        // from the refresh result, and is not compared with the rejected one.
        let session: Session = match self.sessions.current_session().await {
            Ok(Some(session)) => session,
            Ok(None) => {
                return Err(ApiError::AuthRefreshFailure(SessionError::NoUser.to_string()));
            }
            Err(e) => return Err(ApiError::AuthRefreshFailure(e.to_string())),
        };
        attach_bearer(&mut outbound, session.access_token.as_ref());

        debug!(method = %outbound.method, url = %outbound.url, "resending request after refresh");
        let response = self
            .transport
            .send(&outbound)
            .await
            .map_err(|e| ApiError::RetryFailure {
                status: None,
                message: e.to_string(),
            })?;

        if response.is_success() {
            Ok(decode_body(&response.body))
        } else {
            Err(ApiError::RetryFailure {
                status: Some(response.status),
                message: error_message(&response),
            })
        }
    }

    fn prepare(&self, request: ApiRequest) -> TransportRequest {
        let path = request.path.trim_start_matches('/');
        let mut outbound = TransportRequest {
            method: request.method,
            url: format!("{}/{}", self.base_url, path),
            query: request.query,
            headers: vec![(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string())],
            body: request.body,
        };
        for (name, value) in request.headers {
            outbound.set_header(&name, value);
        }
        outbound
    }
}

#[async_trait::async_trait]
impl ApiClient for AuthenticatedApiClient {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        self.execute(request).await
    }
}

fn attach_bearer(request: &mut TransportRequest, token: Option<&AccessToken>) {
    if let Some(token) = token {
        request.set_header(AUTHORIZATION, format!("Bearer {}", token.as_str()));
    }
}

/// Empty bodies become `null`; bodies that are not JSON come back as a
/// JSON string.
fn decode_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

fn error_message(response: &TransportResponse) -> String {
    serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| format!("request failed with status code {}", response.status))
}
