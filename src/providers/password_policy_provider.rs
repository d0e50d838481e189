use thiserror::Error;

/// Shortest email local part that is checked for inclusion in a password
const MIN_CHECKED_LOCAL_PART_LEN: usize = 3;

/// Password policy applied to every password chosen by a user
///
/// Rules, checked in order (fail fast):
/// - Length between `min_length` and `max_length` characters
/// - Must not contain the local part of the account email (case-insensitive)
/// - Must differ from the current password, when one is known
#[derive(Debug, Clone)]
pub struct PasswordPolicyProvider {
    min_length: usize,
    max_length: usize,
}

impl PasswordPolicyProvider {
    pub fn new() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
        }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Validate a candidate password
    ///
    /// # Arguments
    /// * `password` - The new password
    /// * `email` - Email of the account the password is for
    /// * `current_password` - The password being replaced, if the caller has it
    pub fn validate(
        &self,
        password: &str,
        email: &str,
        current_password: Option<&str>,
    ) -> Result<(), PasswordPolicyError> {
        let length = password.chars().count();
        if length < self.min_length {
            return Err(PasswordPolicyError::TooShort(self.min_length));
        }
        if length > self.max_length {
            return Err(PasswordPolicyError::TooLong(self.max_length));
        }

        let local_part = email.split('@').next().unwrap_or_default().to_lowercase();
        if local_part.chars().count() >= MIN_CHECKED_LOCAL_PART_LEN
            && password.to_lowercase().contains(&local_part)
        {
            return Err(PasswordPolicyError::ContainsEmail);
        }

        if current_password == Some(password) {
            return Err(PasswordPolicyError::SameAsCurrent);
        }

        Ok(())
    }
}

impl Default for PasswordPolicyProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Password policy violations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {0} characters")]
    TooShort(usize),

    #[error("Password must not exceed {0} characters")]
    TooLong(usize),

    #[error("Password must not contain your email name")]
    ContainsEmail,

    #[error("New password must be different from the current password")]
    SameAsCurrent,
}
