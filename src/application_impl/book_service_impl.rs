use super::util::{decode, segment};
use crate::application_port::{ApiClient, ApiRequest, BookService, CatalogError};
use crate::domain_model::{Book, BookSearch, CreateBook, UpdateBook};
use std::sync::Arc;

pub struct RealBookService {
    api: Arc<dyn ApiClient>,
}

impl RealBookService {
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl BookService for RealBookService {
    async fn search_books(&self, search: BookSearch) -> Result<Vec<Book>, CatalogError> {
        let request = ApiRequest::get("/books/search").with_query(search.query_pairs());
        decode(self.api.send(request).await?)
    }

    async fn get_all_books(&self) -> Result<Vec<Book>, CatalogError> {
        decode(self.api.send(ApiRequest::get("/books")).await?)
    }

    async fn get_book(&self, id: &str) -> Result<Book, CatalogError> {
        let path = format!("/books/{}", segment(id));
        decode(self.api.send(ApiRequest::get(path)).await?)
    }

    async fn create_book(&self, book: CreateBook) -> Result<Book, CatalogError> {
        book.validate()?;
        let request = ApiRequest::post("/books").with_body(serde_json::to_value(&book)?);
        decode(self.api.send(request).await?)
    }

    async fn update_book(&self, id: &str, update: UpdateBook) -> Result<Book, CatalogError> {
        update.validate()?;
        let path = format!("/books/{}", segment(id));
        let request = ApiRequest::put(path).with_body(serde_json::to_value(&update)?);
        decode(self.api.send(request).await?)
    }

    async fn delete_book(&self, id: &str) -> Result<(), CatalogError> {
        let path = format!("/books/{}", segment(id));
        self.api.send(ApiRequest::delete(path)).await?;
        Ok(())
    }
}
