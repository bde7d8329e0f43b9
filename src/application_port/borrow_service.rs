use super::CatalogError;
use crate::domain_model::{Borrow, CreateBorrow};

#[async_trait::async_trait]
pub trait BorrowService: Send + Sync {
    async fn borrow_book(&self, borrow: CreateBorrow) -> Result<Borrow, CatalogError>;
    async fn return_book(&self, borrow_id: &str) -> Result<Borrow, CatalogError>;
    async fn get_all_borrows(&self) -> Result<Vec<Borrow>, CatalogError>;
    async fn get_borrow(&self, id: &str) -> Result<Borrow, CatalogError>;
}
