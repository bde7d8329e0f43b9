use super::CatalogError;
use crate::domain_model::{Book, BookSearch, CreateBook, UpdateBook};

#[async_trait::async_trait]
pub trait BookService: Send + Sync {
    async fn search_books(&self, search: BookSearch) -> Result<Vec<Book>, CatalogError>;
    async fn get_all_books(&self) -> Result<Vec<Book>, CatalogError>;
    async fn get_book(&self, id: &str) -> Result<Book, CatalogError>;
    async fn create_book(&self, book: CreateBook) -> Result<Book, CatalogError>;
    async fn update_book(&self, id: &str, update: UpdateBook) -> Result<Book, CatalogError>;
    async fn delete_book(&self, id: &str) -> Result<(), CatalogError>;
}
