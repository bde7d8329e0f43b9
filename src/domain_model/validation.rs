use super::{CreateBook, UpdateBook};
use chrono::{Datelike, Utc};

pub const MIN_PUBLISHED_YEAR: i32 = 1800;
const MAX_NAME_CHARS: usize = 100;
const MIN_NAME_CHARS: usize = 2;
const MAX_DESCRIPTION_CHARS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Every rule a book form broke, in field order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid book: {}", summary(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

fn summary(violations: &[FieldViolation]) -> String {
    let messages: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();
    messages.join("; ")
}

impl ValidationError {
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

#[derive(Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldViolation {
            field,
            message: message.into(),
        });
    }

    fn into_result(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations: self.0 })
        }
    }
}

fn check_name(v: &mut Violations, field: &'static str, label: &str, value: &str) {
    let len = value.chars().count();
    if value.trim().is_empty() {
        v.push(field, format!("{label} is required"));
    } else if len < MIN_NAME_CHARS {
        v.push(field, format!("{label} must be at least {MIN_NAME_CHARS} characters"));
    } else if len > MAX_NAME_CHARS {
        v.push(field, format!("{label} must be at most {MAX_NAME_CHARS} characters"));
    }
}

fn check_isbn(v: &mut Violations, isbn: &str) {
    if isbn.is_empty() {
        v.push("isbn", "ISBN is required");
    } else if !isbn.chars().all(|c| c.is_ascii_digit() || c == '-') {
        v.push("isbn", "ISBN must contain only numbers and hyphens");
    }
}

fn check_category(v: &mut Violations, category_id: &str) {
    if category_id.trim().is_empty() {
        v.push("categoryId", "Category is required");
    }
}

fn check_year(v: &mut Violations, year: i32) {
    let current = Utc::now().year();
    if year < MIN_PUBLISHED_YEAR {
        v.push("publishedYear", format!("Year must be {MIN_PUBLISHED_YEAR} or later"));
    } else if year > current {
        v.push("publishedYear", "Year cannot be in the future");
    }
}

fn check_description(v: &mut Violations, description: &str) {
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        v.push(
            "description",
            format!("Description must be at most {MAX_DESCRIPTION_CHARS} characters"),
        );
    }
}

fn check_image_url(v: &mut Violations, url: &str) {
    if !url.is_empty() && reqwest::Url::parse(url).is_err() {
        v.push("imageUrl", "Must be a valid URL");
    }
}

impl CreateBook {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Violations::default();
        check_name(&mut v, "title", "Title", &self.title);
        check_name(&mut v, "author", "Author", &self.author);
        check_isbn(&mut v, &self.isbn);
        check_category(&mut v, &self.category_id);
        if let Some(year) = self.published_year {
            check_year(&mut v, year);
        }
        if let Some(description) = &self.description {
            check_description(&mut v, description);
        }
        if let Some(url) = &self.image_url {
            check_image_url(&mut v, url);
        }
        v.into_result()
    }
}

impl UpdateBook {
    /// Same rules as [`CreateBook::validate`], applied to the fields present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Violations::default();
        if let Some(title) = &self.title {
            check_name(&mut v, "title", "Title", title);
        }
        if let Some(author) = &self.author {
            check_name(&mut v, "author", "Author", author);
        }
        if let Some(isbn) = &self.isbn {
            check_isbn(&mut v, isbn);
        }
        if let Some(category_id) = &self.category_id {
            check_category(&mut v, category_id);
        }
        if let Some(year) = self.published_year {
            check_year(&mut v, year);
        }
        if let Some(description) = &self.description {
            check_description(&mut v, description);
        }
        if let Some(url) = &self.image_url {
            check_image_url(&mut v, url);
        }
        v.into_result()
    }
}
