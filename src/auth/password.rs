use bcrypt::{hash, verify, DEFAULT_COST};

pub fn hash_password(password: &str) -> Result<String, anyhow::Error> {
    hash(password, DEFAULT_COST).map_err(|e| anyhow::anyhow!("Password hashing error: {:?}", e))
}

/// A malformed stored hash counts as a mismatch rather than an error.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match verify(password, password_hash) {
        Ok(is_valid) => is_valid,
        Err(e) => {
            log::warn!("Stored password hash could not be verified: {:?}", e);
            false
        }
    }
}
