//! Client-side views over fetched collections: the listing filters, sort
//! orders, pages and dashboard counters.

mod query;
mod stats;

pub use query::*;
pub use stats::*;
