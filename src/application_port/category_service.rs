use super::CatalogError;
use crate::domain_model::{Category, CreateCategory, UpdateCategory};

#[async_trait::async_trait]
pub trait CategoryService: Send + Sync {
    async fn get_all_categories(&self) -> Result<Vec<Category>, CatalogError>;
    async fn get_category(&self, id: &str) -> Result<Category, CatalogError>;
    async fn create_category(&self, category: CreateCategory) -> Result<Category, CatalogError>;
    async fn update_category(
        &self,
        id: &str,
        update: UpdateCategory,
    ) -> Result<Category, CatalogError>;
    async fn delete_category(&self, id: &str) -> Result<(), CatalogError>;
    async fn search_categories(&self, term: &str) -> Result<Vec<Category>, CatalogError>;
}
