mod book;
mod borrow;
mod category;
mod session;
mod user;
mod validation;

pub use book::*;
pub use borrow::*;
pub use category::*;
pub use session::*;
pub use user::*;
pub use validation::*;
