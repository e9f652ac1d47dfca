use bcrypt::{hash, verify};

use crate::utils::error::AppError;

/// bcrypt work factor for stored credentials.
pub const PASSWORD_HASH_COST: u32 = 10;

/// Hashes a plaintext password with a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    hash(plain, PASSWORD_HASH_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Checks a candidate password against a stored hash.
///
/// A stored value that is not a valid bcrypt hash never matches.
pub fn verify_password(candidate: &str, stored_hash: &str) -> bool {
    match verify(candidate, stored_hash) {
        Ok(matches) => matches,
        Err(e) => {
            log::warn!("⚠️  Stored password hash could not be verified: {}", e);
            false
        }
    }
}
