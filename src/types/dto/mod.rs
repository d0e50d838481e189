// DTOs - request and response bodies of the HTTP API
pub mod admin;
pub mod auth;
pub mod common;
pub mod program;
