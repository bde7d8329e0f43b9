use crate::application_port::{ApiClient, ApiError, ApiRequest};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Answers every request with the same body and keeps what it was sent.
pub(crate) struct CannedApi {
    reply: Result<Value, ApiError>,
    seen: Mutex<Vec<ApiRequest>>,
}

impl CannedApi {
    pub(crate) fn new(reply: Result<Value, ApiError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn seen(&self) -> Vec<ApiRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ApiClient for CannedApi {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        self.seen.lock().unwrap().push(request);
        self.reply.clone()
    }
}
