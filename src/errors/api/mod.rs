// API-facing error types
pub mod admin;
pub mod auth;
pub mod program;

// Re-exports for convenience
pub use admin::AdminError;
pub use auth::AuthError;
pub use program::ProgramApiError;



#[cfg(test)]
mod program_test;
