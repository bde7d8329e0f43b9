mod cognito_identity_service;

pub use cognito_identity_service::*;
