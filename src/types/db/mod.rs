// Database entities - SeaORM models
pub mod account;
pub mod category;
pub mod competency;
pub mod competency_score;
pub mod evaluation;
pub mod intern;
pub mod password_reset_token;
pub mod refresh_token;
