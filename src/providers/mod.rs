// Providers layer - Work performers and business logic
//
// Providers hold the pure logic coordinators orchestrate: the first-access
// gate decision, score aggregation, token and crypto operations, password
// policy and outbound email.

pub mod access_gate;
pub mod crypto_provider;
pub mod email_provider;
pub mod password_policy_provider;
pub mod score_aggregator;
pub mod token_provider;

pub use email_provider::{EmailMessage, EmailSender, LoggingEmailSender, RecordingEmailSender};
pub use password_policy_provider::{PasswordPolicyError, PasswordPolicyProvider};
pub use score_aggregator::ScoreAggregator;
pub use token_provider::TokenProvider;
