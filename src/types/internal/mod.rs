// Internal types - never exposed over the API
pub mod access;
pub mod auth;
pub mod context;
pub mod evaluation;
