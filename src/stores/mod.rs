// Stores layer - Data access and repository pattern
pub mod credential_store;
pub mod evaluation_store;
pub mod program_store;

pub use credential_store::{CredentialStore, NewAccount};
pub use evaluation_store::EvaluationStore;
pub use program_store::{NewCompetency, NewIntern, ProgramStore};
