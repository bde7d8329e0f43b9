mod api_client;
mod book_service;
mod borrow_service;
mod catalog_error;
mod category_service;
mod identity_service;

pub use api_client::*;
pub use book_service::*;
pub use borrow_service::*;
pub use catalog_error::*;
pub use category_service::*;
pub use identity_service::*;
