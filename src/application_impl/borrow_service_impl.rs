use super::util::{decode, segment};
use crate::application_port::{ApiClient, ApiRequest, BorrowService, CatalogError};
use crate::domain_model::{Borrow, CreateBorrow};
use std::sync::Arc;

pub struct RealBorrowService {
    api: Arc<dyn ApiClient>,
}

impl RealBorrowService {
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl BorrowService for RealBorrowService {
    async fn borrow_book(&self, borrow: CreateBorrow) -> Result<Borrow, CatalogError> {
        let request = ApiRequest::post("/borrows").with_body(serde_json::to_value(&borrow)?);
        decode(self.api.send(request).await?)
    }

    async fn return_book(&self, borrow_id: &str) -> Result<Borrow, CatalogError> {
        let path = format!("/borrows/{}/return", segment(borrow_id));
        decode(self.api.send(ApiRequest::post(path)).await?)
    }

    async fn get_all_borrows(&self) -> Result<Vec<Borrow>, CatalogError> {
        decode(self.api.send(ApiRequest::get("/borrows")).await?)
    }

    async fn get_borrow(&self, id: &str) -> Result<Borrow, CatalogError> {
        let path = format!("/borrows/{}", segment(id));
        decode(self.api.send(ApiRequest::get(path)).await?)
    }
}
