pub mod logger;
pub mod settings;

pub mod library;

pub mod application_impl;
pub mod application_port;
pub mod catalog;
pub mod domain_model;
pub mod domain_port;
pub mod infra_cognito;
pub mod infra_http;
