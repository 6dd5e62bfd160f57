pub mod auth;
pub mod axum_http;
pub mod backend_api;
pub mod background;
pub mod cache;
pub mod config;
pub mod observability;
pub mod session;
pub mod usecases;
