use crate::domain_model::{Book, Category};
use serde::Serialize;

/// Counters shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total_books: usize,
    pub available: usize,
    pub borrowed: usize,
    pub categories: usize,
}

impl CatalogStats {
    pub fn compute(books: &[Book], categories: &[Category]) -> Self {
        let available = books.iter().filter(|b| b.available).count();
        Self {
            total_books: books.len(),
            available,
            borrowed: books.len() - available,
            categories: categories.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_available_and_borrowed() {
        let book = |id: &str, available: bool| Book {
            id: id.into(),
            title: "t".into(),
            author: "a".into(),
            isbn: "1".into(),
            category_id: "c".into(),
            quantity: 1,
            description: None,
            published_year: 2000,
            available,
            image_url: None,
        };
        let stats = CatalogStats::compute(&[book("1", true), book("2", false), book("3", true)], &[]);
        assert_eq!(
            stats,
            CatalogStats {
                total_books: 3,
                available: 2,
                borrowed: 1,
                categories: 0
            }
        );
    }
}
