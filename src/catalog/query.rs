use crate::domain_model::{Book, Category};
use serde::Serialize;
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Title,
    Author,
    Year,
    Availability,
    Isbn,
    Quantity,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "title" => Ok(SortKey::Title),
            "author" => Ok(SortKey::Author),
            "year" | "publishedyear" => Ok(SortKey::Year),
            "available" | "availability" => Ok(SortKey::Availability),
            "isbn" => Ok(SortKey::Isbn),
            "quantity" => Ok(SortKey::Quantity),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based.
    pub index: usize,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub index: usize,
    pub size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookQuery {
    pub search: String,
    /// `None` or `"all"` keeps every category.
    pub category: Option<String>,
    pub sort_by: SortKey,
    pub order: SortOrder,
    pub page: Option<PageRequest>,
}

impl BookQuery {
    fn matches(&self, book: &Book, needle: &str) -> bool {
        let in_category = match self.category.as_deref() {
            None | Some("all") | Some("") => true,
            Some(category) => book.category_id == category,
        };
        let in_search = needle.is_empty()
            || book.title.to_lowercase().contains(needle)
            || book.author.to_lowercase().contains(needle)
            || book.isbn.to_lowercase().contains(needle);
        in_category && in_search
    }

    fn compare(&self, a: &Book, b: &Book) -> Ordering {
        let ordering = match self.sort_by {
            SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortKey::Author => a.author.to_lowercase().cmp(&b.author.to_lowercase()),
            SortKey::Year => a.published_year.cmp(&b.published_year),
            // Available books come first when ascending.
            SortKey::Availability => b.available.cmp(&a.available),
            SortKey::Isbn => a.isbn.cmp(&b.isbn),
            SortKey::Quantity => a.quantity.cmp(&b.quantity),
        };
        match self.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }

    pub fn apply(&self, books: &[Book]) -> Page<Book> {
        let needle = self.search.trim().to_lowercase();
        let mut matched: Vec<Book> = books
            .iter()
            .filter(|book| self.matches(book, &needle))
            .cloned()
            .collect();
        matched.sort_by(|a, b| self.compare(a, b));
        paginate(matched, self.page)
    }
}

/// Slices `items` into the requested page. Without a request everything is
/// returned as a single page.
pub fn paginate<T>(items: Vec<T>, page: Option<PageRequest>) -> Page<T> {
    let total_items = items.len();
    let Some(PageRequest { index, size }) = page else {
        return Page {
            total_pages: usize::from(total_items > 0),
            size: total_items,
            index: 0,
            items,
            total_items,
        };
    };
    let size = size.max(1);
    let total_pages = total_items.div_ceil(size);
    let items = items
        .into_iter()
        .skip(index.saturating_mul(size))
        .take(size)
        .collect();
    Page {
        items,
        index,
        size,
        total_items,
        total_pages,
    }
}

pub fn filter_categories(categories: &[Category], term: &str) -> Vec<Category> {
    let needle = term.trim().to_lowercase();
    categories
        .iter()
        .filter(|c| {
            needle.is_empty()
                || c.name.to_lowercase().contains(&needle)
                || c.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}
