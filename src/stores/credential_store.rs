use argon2::{password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, IntoActiveModel,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::errors::internal::{CredentialError, DatabaseError};
use crate::errors::InternalError;
use crate::types::db::account::{self, Entity as Account};
use crate::types::db::{password_reset_token, refresh_token};
use crate::types::internal::auth::Role;

/// Input for provisioning an account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub password: String,
    pub first_access_completed: bool,
}

/// Normalize an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Parse the stored role column
pub fn account_role(account: &account::Model) -> Result<Role, InternalError> {
    account.role.parse::<Role>().map_err(|_| {
        InternalError::Database(DatabaseError::CorruptValue {
            column: "accounts.role".to_string(),
            value: account.role.clone(),
        })
    })
}

/// CredentialStore manages accounts, password hashes, refresh tokens and reset tokens
///
/// Methods taking `conn` run on whatever connection or transaction the caller
/// passes, so coordinators can group several writes atomically.
pub struct CredentialStore {
    db: DatabaseConnection,
    password_pepper: String,
}

impl CredentialStore {
    /// Create a new CredentialStore with the given database connection and password pepper
    ///
    /// # Arguments
    /// * `db` - The database connection
    /// * `password_pepper` - The secret key used for password hashing (from SecretManager)
    pub fn new(db: DatabaseConnection, password_pepper: String) -> Self {
        Self { db, password_pepper }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Begin a transaction on the identity database
    pub async fn begin_transaction(&self, operation: &str) -> Result<DatabaseTransaction, InternalError> {
        tracing::trace!(operation = %operation, "Beginning transaction");
        self.db.begin().await.map_err(InternalError::transaction_begin)
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", format!("Failed to initialize Argon2 with secret: {}", e)))
    }

    /// Hash a password with Argon2id using the pepper as secret parameter
    pub fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::PasswordHashingFailed(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Check a password against an account's stored hash
    pub fn password_matches(&self, account: &account::Model, password: &str) -> Result<bool, InternalError> {
        let parsed_hash = PasswordHash::new(&account.password_hash).map_err(|_| {
            InternalError::Database(DatabaseError::CorruptValue {
                column: "accounts.password_hash".to_string(),
                value: "<unparseable hash>".to_string(),
            })
        })?;

        Ok(self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Create an account
    ///
    /// # Returns
    /// * `Ok(account::Model)` - The stored account
    /// * `Err(InternalError)` - DuplicateEmail if the email is taken, or a database error
    pub async fn create_account(
        &self,
        conn: &impl ConnectionTrait,
        new_account: NewAccount,
    ) -> Result<account::Model, InternalError> {
        let email = normalize_email(&new_account.email);

        if self.find_account_by_email(conn, &email).await?.is_some() {
            return Err(CredentialError::DuplicateEmail(email).into());
        }

        let password_hash = self.hash_password(&new_account.password)?;
        let now = Utc::now().timestamp();

        let model = account::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            email: Set(email),
            display_name: Set(new_account.display_name.trim().to_string()),
            password_hash: Set(password_hash),
            role: Set(new_account.role.as_str().to_string()),
            email_confirmed: Set(false),
            locked_out: Set(false),
            first_access_completed: Set(new_account.first_access_completed),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let account = model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_account", e))?;

        tracing::info!(account_id = %account.id, role = %account.role, "Account created");

        Ok(account)
    }

    pub async fn find_account_by_email(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
    ) -> Result<Option<account::Model>, InternalError> {
        Account::find()
            .filter(account::Column::Email.eq(normalize_email(email)))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_account_by_email", e))
    }

    pub async fn get_account_by_id(
        &self,
        conn: &impl ConnectionTrait,
        account_id: &str,
    ) -> Result<account::Model, InternalError> {
        Account::find_by_id(account_id.to_owned())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_account_by_id", e))?
            .ok_or_else(|| CredentialError::AccountNotFound(account_id.to_owned()).into())
    }

    /// Read the first-access flag of an account
    ///
    /// `Ok(None)` when the account does not exist.
    pub async fn first_access_completed(&self, account_id: &str) -> Result<Option<bool>, InternalError> {
        let account = Account::find_by_id(account_id.to_owned())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_first_access_completed", e))?;

        Ok(account.map(|a| a.first_access_completed))
    }

    /// Verify email and password
    ///
    /// Unknown emails and wrong passwords both yield InvalidCredentials. A locked
    /// out account is only reported once the password has been verified.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<account::Model, InternalError> {
        let account = self
            .find_account_by_email(&self.db, email)
            .await?
            .ok_or(CredentialError::InvalidCredentials)?;

        if !self.password_matches(&account, password)? {
            return Err(CredentialError::InvalidCredentials.into());
        }

        if account.locked_out {
            return Err(CredentialError::LockedOut {
                account_id: account.id.clone(),
            }
            .into());
        }

        Ok(account)
    }

    /// Set a new password chosen by the account holder
    ///
    /// This is the only writer that marks first access as completed.
    pub async fn complete_password_change_in_txn(
        &self,
        conn: &impl ConnectionTrait,
        account_id: &str,
        new_password: &str,
    ) -> Result<account::Model, InternalError> {
        let account = self.get_account_by_id(conn, account_id).await?;
        let was_pending = !account.first_access_completed;
        let password_hash = self.hash_password(new_password)?;

        let mut active = account.into_active_model();
        active.password_hash = Set(password_hash);
        active.first_access_completed = Set(true);
        active.updated_at = Set(Utc::now().timestamp());

        let updated = active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("complete_password_change", e))?;

        if was_pending {
            tracing::info!(account_id = %account_id, "First access completed");
        }

        Ok(updated)
    }

    /// Replace the password with an administrator-issued temporary one
    ///
    /// Sends the account back through the first-access gate.
    pub async fn require_first_access_in_txn(
        &self,
        conn: &impl ConnectionTrait,
        account_id: &str,
        temporary_password: &str,
    ) -> Result<account::Model, InternalError> {
        let account = self.get_account_by_id(conn, account_id).await?;
        let password_hash = self.hash_password(temporary_password)?;

        let mut active = account.into_active_model();
        active.password_hash = Set(password_hash);
        active.first_access_completed = Set(false);
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("require_first_access", e))
    }

    /// Store a refresh token hash for an account
    pub async fn store_refresh_token(
        &self,
        conn: &impl ConnectionTrait,
        account_id: &str,
        token_hash: &str,
        expires_at: i64,
    ) -> Result<(), InternalError> {
        let new_token = refresh_token::ActiveModel {
            token_hash: Set(token_hash.to_owned()),
            account_id: Set(account_id.to_owned()),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now().timestamp()),
        };

        new_token
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_refresh_token", e))?;

        Ok(())
    }

    /// Validate a refresh token and return the associated account_id
    pub async fn validate_refresh_token(
        &self,
        conn: &impl ConnectionTrait,
        token_hash: &str,
    ) -> Result<String, InternalError> {
        let token = refresh_token::Entity::find_by_id(token_hash.to_owned())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_refresh_token", e))?
            .ok_or_else(|| CredentialError::invalid_token("refresh_token", "not found"))?;

        if token.expires_at < Utc::now().timestamp() {
            return Err(CredentialError::ExpiredToken("refresh_token".to_string()).into());
        }

        Ok(token.account_id)
    }

    /// Revoke a refresh token by deleting it from the database
    ///
    /// # Returns
    /// * `Ok(account_id)` - Token revoked
    /// * `Err(InternalError)` - InvalidToken if the token was not found
    pub async fn revoke_refresh_token(
        &self,
        conn: &impl ConnectionTrait,
        token_hash: &str,
    ) -> Result<String, InternalError> {
        let token = refresh_token::Entity::find_by_id(token_hash.to_owned())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_refresh_token", e))?
            .ok_or_else(|| CredentialError::invalid_token("refresh_token", "not found"))?;

        refresh_token::Entity::delete_by_id(token_hash.to_owned())
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("revoke_refresh_token", e))?;

        Ok(token.account_id)
    }

    /// Delete every refresh token of an account
    pub async fn revoke_all_refresh_tokens(
        &self,
        conn: &impl ConnectionTrait,
        account_id: &str,
    ) -> Result<u64, InternalError> {
        let result = refresh_token::Entity::delete_many()
            .filter(refresh_token::Column::AccountId.eq(account_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("revoke_all_refresh_tokens", e))?;

        tracing::debug!(account_id = %account_id, revoked = result.rows_affected, "Refresh tokens revoked");

        Ok(result.rows_affected)
    }

    /// Store a password reset token hash, replacing any earlier one for the account
    pub async fn store_reset_token(
        &self,
        conn: &impl ConnectionTrait,
        account_id: &str,
        token_hash: &str,
        expires_at: i64,
    ) -> Result<(), InternalError> {
        password_reset_token::Entity::delete_many()
            .filter(password_reset_token::Column::AccountId.eq(account_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("clear_reset_tokens", e))?;

        let new_token = password_reset_token::ActiveModel {
            token_hash: Set(token_hash.to_owned()),
            account_id: Set(account_id.to_owned()),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now().timestamp()),
        };

        new_token
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_reset_token", e))?;

        Ok(())
    }

    /// Consume a reset token and return its account_id
    ///
    /// The token is deleted whether or not it has expired.
    pub async fn consume_reset_token(
        &self,
        conn: &impl ConnectionTrait,
        token_hash: &str,
    ) -> Result<String, InternalError> {
        let token = password_reset_token::Entity::find_by_id(token_hash.to_owned())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_reset_token", e))?
            .ok_or_else(|| CredentialError::invalid_token("reset_token", "not found"))?;

        password_reset_token::Entity::delete_by_id(token_hash.to_owned())
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("consume_reset_token", e))?;

        if token.expires_at < Utc::now().timestamp() {
            return Err(CredentialError::ExpiredToken("reset_token".to_string()).into());
        }

        Ok(token.account_id)
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("db", &"<connection>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Display for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CredentialStore {{ db: <connection>, password_pepper: <redacted> }}")
    }
}
