// Password hashing utilities
// Uses bcrypt; hashes carry their own salt

use bcrypt::{hash, verify};

/// bcrypt work factor for stored passwords
pub const HASH_COST: u32 = 10;

/// Hashes a password using bcrypt
///
/// # Example
/// ```
/// use league_api::auth::password::hash_password;
///
/// let hash = hash_password("Secret123").expect("valid hash");
/// assert!(hash.starts_with("$2"));
/// ```
pub fn hash_password(password: &str) -> Result<String, String> {
    hash(password, HASH_COST).map_err(|e| e.to_string())
}

/// Verifies a password against a bcrypt hash
///
/// # Returns
/// * `Ok(bool)` - True if password matches, false otherwise
/// * `Err(String)` - If the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    verify(password, hash).map_err(|e| e.to_string())
}
