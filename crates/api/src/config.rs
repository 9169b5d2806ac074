//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MARKETPLACE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `JWT_SECRET` - Token signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `MARKETPLACE_HOST` - Bind address (default: 127.0.0.1)
//! - `MARKETPLACE_PORT` - Listen port (default: 3000)
//! - `JWT_EXPIRES_HOURS` - Token lifetime in hours, 1-8760 (default: 8)
//! - `JWT_ISSUER` - Token issuer claim (default: Ecommerce)
//! - `PASSWORD_HASH_COST` - Argon2 time cost, 1-10 (default: 3)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::ops::RangeInclusive;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const PASSWORD_HASH_COST_RANGE: RangeInclusive<u32> = 1..=10;

/// Token lifetime bounds in hours (up to one year)
const JWT_EXPIRES_HOURS_RANGE: RangeInclusive<u32> = 1..=8760;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Token signing configuration
    pub token: TokenConfig,
    /// Argon2 time cost used when hashing new passwords
    pub password_hash_cost: u32,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Token issuance configuration.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HS256 signing secret
    pub secret: SecretString,
    /// Token lifetime in hours
    pub expires_in_hours: u32,
    /// Value of the `iss` claim
    pub issuer: String,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ApiConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let database_url = env.database_url("MARKETPLACE_DATABASE_URL")?;
        let host = env.parsed_or_default::<IpAddr>("MARKETPLACE_HOST", "127.0.0.1")?;
        let port = env.parsed_or_default::<u16>("MARKETPLACE_PORT", "3000")?;

        let token = TokenConfig::from_env(&env)?;

        let password_hash_cost = env.parsed_or_default::<u32>("PASSWORD_HASH_COST", "3")?;
        if !PASSWORD_HASH_COST_RANGE.contains(&password_hash_cost) {
            return Err(ConfigError::InvalidEnvVar(
                "PASSWORD_HASH_COST".to_string(),
                format!(
                    "must be between {} and {} (got {password_hash_cost})",
                    PASSWORD_HASH_COST_RANGE.start(),
                    PASSWORD_HASH_COST_RANGE.end()
                ),
            ));
        }

        Ok(Self {
            database_url,
            host,
            port,
            token,
            password_hash_cost,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl TokenConfig {
    fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = env.validated_secret("JWT_SECRET")?;
        validate_jwt_secret(&secret, "JWT_SECRET")?;

        let expires_in_hours = env.parsed_or_default::<u32>("JWT_EXPIRES_HOURS", "8")?;
        if !JWT_EXPIRES_HOURS_RANGE.contains(&expires_in_hours) {
            return Err(ConfigError::InvalidEnvVar(
                "JWT_EXPIRES_HOURS".to_string(),
                format!(
                    "must be between {} and {} (got {expires_in_hours})",
                    JWT_EXPIRES_HOURS_RANGE.start(),
                    JWT_EXPIRES_HOURS_RANGE.end()
                ),
            ));
        }

        Ok(Self {
            secret,
            expires_in_hours,
            issuer: env.or_default("JWT_ISSUER", "Ecommerce"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable source. Empty values count as unset.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed_or_default<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Database URL with fallback to generic `DATABASE_URL`.
    fn database_url(&self, primary_key: &str) -> Result<SecretString, ConfigError> {
        self.optional(primary_key)
            .or_else(|| self.optional("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }
}

/// Validate that the signing secret meets minimum length requirements.
fn validate_jwt_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_JWT_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const GOOD_SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("MARKETPLACE_DATABASE_URL", "postgres://localhost/marketplace"),
            ("JWT_SECRET", GOOD_SECRET),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = load(&minimal()).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.token.expires_in_hours, 8);
        assert_eq!(config.token.issuer, "Ecommerce");
        assert_eq!(config.password_hash_cost, 3);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let mut vars = minimal();
        vars.extend([
            ("MARKETPLACE_HOST", "0.0.0.0"),
            ("MARKETPLACE_PORT", "8080"),
            ("JWT_EXPIRES_HOURS", "24"),
            ("JWT_ISSUER", "Marketplace"),
            ("PASSWORD_HASH_COST", "5"),
            ("SENTRY_ENVIRONMENT", "staging"),
        ]);
        let config = load(&vars).unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.token.expires_in_hours, 24);
        assert_eq!(config.token.issuer, "Marketplace");
        assert_eq!(config.password_hash_cost, 5);
        assert_eq!(config.sentry_environment.as_deref(), Some("staging"));
    }

    #[test]
    fn test_database_url_fallback() {
        let config = load(&[
            ("DATABASE_URL", "postgres://fallback/db"),
            ("JWT_SECRET", GOOD_SECRET),
        ])
        .unwrap();
        assert_eq!(config.database_url.expose_secret(), "postgres://fallback/db");
    }

    #[test]
    fn test_missing_required() {
        let err = load(&[("JWT_SECRET", GOOD_SECRET)]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "MARKETPLACE_DATABASE_URL"));

        let err = load(&[("MARKETPLACE_DATABASE_URL", "postgres://x/y")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "JWT_SECRET"));
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("MARKETPLACE_PORT", "not-a-port"),
            ("MARKETPLACE_HOST", "localhost:3000"),
            ("JWT_EXPIRES_HOURS", "0"),
            ("JWT_EXPIRES_HOURS", "8761"),
            ("JWT_EXPIRES_HOURS", "4000000000"),
            ("PASSWORD_HASH_COST", "0"),
            ("PASSWORD_HASH_COST", "11"),
        ] {
            let mut vars = minimal();
            vars.push((key, value));
            let err = load(&vars).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == key),
                "{key}={value} should be rejected"
            );
        }
    }

    #[test]
    fn test_short_secret_rejected() {
        let err = load(&[
            ("MARKETPLACE_DATABASE_URL", "postgres://x/y"),
            ("JWT_SECRET", "aB3$xY9!mK2@nL5#"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-jwt-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("abababababababababababababababab", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength(GOOD_SECRET, "TEST_VAR").is_ok());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = load(&minimal()).unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains(GOOD_SECRET));
        assert!(!debug_output.contains("postgres://localhost/marketplace"));
    }
}
