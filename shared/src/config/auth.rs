//! Authentication configuration: signing keys, token lifetimes and the refresh-token pepper

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// JWT authentication configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Path to the PEM-encoded RSA private key used for signing
    pub private_key_path: PathBuf,

    /// Path to the PEM-encoded RSA public key used for verification
    #[serde(default)]
    pub public_key_path: Option<PathBuf>,

    /// Passphrase protecting the private key, if it is encrypted
    #[serde(default)]
    pub private_key_passphrase: Option<String>,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,

    /// Secret mixed into every refresh-token hash
    pub refresh_token_pepper: String,

    /// Algorithm for JWT signing (only RS256 is supported)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("private_key_path", &self.private_key_path)
            .field("public_key_path", &self.public_key_path)
            .field("private_key_passphrase", &self.private_key_passphrase.as_ref().map(|_| "***"))
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("refresh_token_pepper", &"***")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            private_key_path: PathBuf::from("core/keys/jwt_private_key.pem"),
            public_key_path: Some(PathBuf::from("core/keys/jwt_public_key.pem")),
            private_key_passphrase: None,
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
            issuer: String::from("edusuite"),
            audience: String::from("edusuite-api"),
            refresh_token_pepper: String::from(DEFAULT_PEPPER),
            algorithm: default_algorithm(),
        }
    }
}

const DEFAULT_PEPPER: &str = "development-pepper-change-in-production";

impl JwtConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let private_key_path = std::env::var("JWT_PRIVATE_KEY_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.private_key_path);
        let public_key_path = match std::env::var("JWT_PUBLIC_KEY_PATH") {
            Ok(path) if path.is_empty() => None,
            Ok(path) => Some(PathBuf::from(path)),
            Err(_) => defaults.public_key_path,
        };
        let private_key_passphrase = std::env::var("JWT_PASSPHRASE")
            .ok()
            .filter(|p| !p.is_empty());
        let access_token_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "900".to_string())
            .parse()
            .unwrap_or(900);
        let refresh_token_expiry = std::env::var("JWT_REFRESH_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "604800".to_string())
            .parse()
            .unwrap_or(604800);

        Self {
            private_key_path,
            public_key_path,
            private_key_passphrase,
            access_token_expiry,
            refresh_token_expiry,
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or(defaults.audience),
            refresh_token_pepper: std::env::var("REFRESH_TOKEN_PEPPER")
                .unwrap_or(defaults.refresh_token_pepper),
            algorithm: default_algorithm(),
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Set the refresh-token pepper
    pub fn with_pepper(mut self, pepper: impl Into<String>) -> Self {
        self.refresh_token_pepper = pepper.into();
        self
    }

    /// Check if using the development pepper (security warning)
    pub fn is_using_default_pepper(&self) -> bool {
        self.refresh_token_pepper == DEFAULT_PEPPER
    }

    /// Validate lifetimes and secrets
    ///
    /// # Returns
    /// * `Ok(())` - Configuration is usable
    /// * `Err(String)` - Description of the first problem found
    pub fn validate(&self) -> Result<(), String> {
        if self.access_token_expiry <= 0 {
            return Err("access_token_expiry must be positive".to_string());
        }
        if self.refresh_token_expiry <= 0 {
            return Err("refresh_token_expiry must be positive".to_string());
        }
        if self.access_token_expiry >= self.refresh_token_expiry {
            return Err("access_token_expiry must be shorter than refresh_token_expiry".to_string());
        }
        if self.refresh_token_pepper.is_empty() {
            return Err("refresh_token_pepper must not be empty".to_string());
        }
        if self.algorithm != "RS256" {
            return Err(format!("unsupported signing algorithm: {}", self.algorithm));
        }
        Ok(())
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            jwt: JwtConfig::from_env(),
        }
    }

    /// Get access token expiry in seconds
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.jwt.access_token_expiry
    }

    /// Get refresh token expiry in seconds
    pub fn refresh_token_expiry_seconds(&self) -> i64 {
        self.jwt.refresh_token_expiry
    }
}

fn default_algorithm() -> String {
    String::from("RS256")
}
