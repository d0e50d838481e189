use hmac::{Hmac, Mac};
use rand::seq::SliceRandom;
use rand::Rng;
use sha2::Sha256;

use crate::errors::InternalError;

type HmacSha256 = Hmac<Sha256>;

const TEMPORARY_PASSWORD_LENGTH: usize = 16;
const UPPERCASE: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijkmnopqrstuvwxyz";
const DIGITS: &[u8] = b"23456789";
const SYMBOLS: &[u8] = b"!@#$%&*-_=+?";

/// Compute HMAC-SHA256 of a token and return it as a hexadecimal string
///
/// Refresh and reset tokens are only ever stored in this form.
pub fn hmac_sha256_token(key: &str, token: &str) -> Result<String, InternalError> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| InternalError::crypto("hmac_init", e.to_string()))?;
    mac.update(token.as_bytes());
    let result = mac.finalize();
    Ok(format!("{:x}", result.into_bytes()))
}

/// Generate a temporary password for newly provisioned or reset accounts
///
/// Always contains at least one uppercase letter, lowercase letter, digit and
/// symbol. Visually ambiguous characters (0/O, 1/l/I) are left out since the
/// password is read from an email.
pub fn generate_temporary_password() -> String {
    let mut rng = rand::rng();
    let all: Vec<u8> = [UPPERCASE, LOWERCASE, DIGITS, SYMBOLS].concat();

    let mut password: Vec<u8> = [UPPERCASE, LOWERCASE, DIGITS, SYMBOLS]
        .iter()
        .map(|set| set[rng.random_range(0..set.len())])
        .collect();

    while password.len() < TEMPORARY_PASSWORD_LENGTH {
        password.push(all[rng.random_range(0..all.len())]);
    }
    password.shuffle(&mut rng);

    password.into_iter().map(char::from).collect()
}
