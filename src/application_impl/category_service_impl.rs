use super::util::{decode, segment};
use crate::application_port::{ApiClient, ApiRequest, CatalogError, CategoryService};
use crate::domain_model::{Category, CreateCategory, UpdateCategory};
use std::sync::Arc;

pub struct RealCategoryService {
    api: Arc<dyn ApiClient>,
}

impl RealCategoryService {
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl CategoryService for RealCategoryService {
    async fn get_all_categories(&self) -> Result<Vec<Category>, CatalogError> {
        decode(self.api.send(ApiRequest::get("/categories")).await?)
    }

    async fn get_category(&self, id: &str) -> Result<Category, CatalogError> {
        let path = format!("/categories/{}", segment(id));
        decode(self.api.send(ApiRequest::get(path)).await?)
    }

    async fn create_category(&self, category: CreateCategory) -> Result<Category, CatalogError> {
        let request = ApiRequest::post("/categories").with_body(serde_json::to_value(&category)?);
        decode(self.api.send(request).await?)
    }

    async fn update_category(
        &self,
        id: &str,
        update: UpdateCategory,
    ) -> Result<Category, CatalogError> {
        let path = format!("/categories/{}", segment(id));
        let request = ApiRequest::put(path).with_body(serde_json::to_value(&update)?);
        decode(self.api.send(request).await?)
    }

    async fn delete_category(&self, id: &str) -> Result<(), CatalogError> {
        let path = format!("/categories/{}", segment(id));
        self.api.send(ApiRequest::delete(path)).await?;
        Ok(())
    }

    async fn search_categories(&self, term: &str) -> Result<Vec<Category>, CatalogError> {
        let request = ApiRequest::get("/categories")
            .with_query(vec![("search".to_string(), term.to_string())]);
        decode(self.api.send(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::canned_api::CannedApi;
    use crate::domain_port::HttpMethod;
    use serde_json::{Value, json};

    fn fiction() -> Value {
        json!({
            "id": "fiction",
            "name": "Fiction",
            "description": "Novels and short stories",
            "booksCount": 12
        })
    }

    #[tokio::test]
    async fn search_passes_the_term_as_a_query_parameter() {
        let api = CannedApi::new(Ok(json!([fiction()])));
        let categories = RealCategoryService::new(api.clone())
            .search_categories("fic tion")
            .await
            .unwrap();

        assert_eq!(categories[0].books_count, Some(12));
        let request = &api.seen()[0];
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path, "/categories");
        assert_eq!(
            request.query,
            vec![("search".to_string(), "fic tion".to_string())]
        );
    }

    #[tokio::test]
    async fn update_puts_only_changed_fields() {
        let api = CannedApi::new(Ok(fiction()));
        RealCategoryService::new(api.clone())
            .update_category(
                "fiction",
                UpdateCategory {
                    description: Some("Stories".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let request = &api.seen()[0];
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.path, "/categories/fiction");
        assert_eq!(request.body, Some(json!({ "description": "Stories" })));
    }

    #[tokio::test]
    async fn create_posts_the_new_category() {
        let api = CannedApi::new(Ok(fiction()));
        let created = RealCategoryService::new(api.clone())
            .create_category(CreateCategory {
                name: "Fiction".into(),
                description: "Novels and short stories".into(),
            })
            .await
            .unwrap();

        assert_eq!(created.id, "fiction");
        let request = &api.seen()[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(
            request.body,
            Some(json!({ "name": "Fiction", "description": "Novels and short stories" }))
        );
    }

    #[tokio::test]
    async fn delete_ignores_the_response_body() {
        let api = CannedApi::new(Ok(Value::Null));
        RealCategoryService::new(api.clone())
            .delete_category("old shelf")
            .await
            .unwrap();

        assert_eq!(api.seen()[0].method, HttpMethod::Delete);
        assert_eq!(api.seen()[0].path, "/categories/old%20shelf");
    }
}
