mod http_transport;
mod session_provider;

pub use http_transport::*;
pub use session_provider::*;
