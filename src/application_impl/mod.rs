mod authenticated_api_client;
mod book_service_impl;
mod borrow_service_impl;
#[cfg(test)]
mod canned_api;
mod category_service_impl;
mod identity_service_fake;
mod util;

pub use authenticated_api_client::*;
pub use book_service_impl::*;
pub use borrow_service_impl::*;
pub use category_service_impl::*;
pub use identity_service_fake::*;
