//! Argon2id password hashing.

use core::fmt;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use thiserror::Error;

use super::AuthError;

/// Errors building a [`CredentialHasher`].
#[derive(Debug, Error)]
pub enum HasherError {
    /// Argon2 rejected the cost parameters.
    #[error("invalid argon2 parameters (time cost {time_cost}): {source}")]
    InvalidParams {
        time_cost: u32,
        #[source]
        source: argon2::Error,
    },
}

/// Hashes and verifies customer passwords.
///
/// The work factor is the Argon2 time cost (number of passes). Hashes are
/// PHC strings, so the parameters used at hashing time travel with the hash
/// and verification keeps working after the configured cost changes.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
    time_cost: u32,
}

impl fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("algorithm", &"argon2id")
            .field("time_cost", &self.time_cost)
            .finish()
    }
}

impl CredentialHasher {
    /// Create a hasher with the given Argon2 time cost.
    ///
    /// # Errors
    ///
    /// Returns `HasherError::InvalidParams` if argon2 rejects the time cost.
    pub fn new(time_cost: u32) -> Result<Self, HasherError> {
        let params = Params::new(
            Params::DEFAULT_M_COST,
            time_cost,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|source| HasherError::InvalidParams { time_cost, source })?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            time_cost,
        })
    }

    /// The configured Argon2 time cost.
    #[must_use]
    pub const fn time_cost(&self) -> u32 {
        self.time_cost
    }

    /// Hash a password with a fresh random salt.
    ///
    /// Runs on the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails.
    pub async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let argon2 = self.argon2.clone();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hash_with(&argon2, &password))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing task failed");
                AuthError::PasswordHash
            })?
    }

    /// Verify a password against a stored PHC hash.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on mismatch or if the stored
    /// hash cannot be parsed.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<(), AuthError> {
        let argon2 = self.argon2.clone();
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || verify_with(&argon2, &password, &hash))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Password verification task failed");
                AuthError::PasswordHash
            })?
    }
}

fn hash_with(argon2: &Argon2<'_>, password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

fn verify_with(argon2: &Argon2<'_>, password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
