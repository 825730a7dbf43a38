//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup; nothing re-reads the environment
//! afterwards.

use std::env;
use std::path::PathBuf;

/// Storage backend selected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Remote user-record store (Firestore)
    Remote,
    /// Local single-file fallback store
    Local,
}

impl std::str::FromStr for BackendKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remote" => Ok(BackendKind::Remote),
            "local" => Ok(BackendKind::Local),
            _ => Err(()),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL the sign-in flow redirects back to
    pub frontend_url: String,
    /// Which storage backend to wire
    pub storage_backend: BackendKind,
    /// GCP project ID (remote backend)
    pub gcp_project_id: String,
    /// Path of the local fallback store file
    pub local_store_path: PathBuf,

    // --- Identity provider ---
    /// Authorization endpoint the sign-in redirect targets
    pub provider_auth_url: String,
    /// Token endpoint for the code exchange
    pub provider_token_url: String,
    /// Userinfo endpoint delivering the subject's profile
    pub provider_userinfo_url: String,
    /// OAuth client ID (public)
    pub oauth_client_id: String,
    /// OAuth client secret
    pub oauth_client_secret: String,
    /// Scopes requested at sign-in
    pub oauth_scope: String,
    /// HMAC key signing the OAuth state parameter (raw bytes)
    pub oauth_state_key: Vec<u8>,

    /// Vendor script URLs injected into the shell page, in order
    pub vendor_scripts: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let storage_backend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("STORAGE_BACKEND"))?;

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            storage_backend,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            local_store_path: env::var("LOCAL_STORE_PATH")
                .unwrap_or_else(|_| ".wodboard/store.json".to_string())
                .into(),

            provider_auth_url: env::var("PROVIDER_AUTH_URL")
                .unwrap_or_else(|_| "https://www.facebook.com/v12.0/dialog/oauth".to_string()),
            provider_token_url: env::var("PROVIDER_TOKEN_URL").unwrap_or_else(|_| {
                "https://graph.facebook.com/v12.0/oauth/access_token".to_string()
            }),
            provider_userinfo_url: env::var("PROVIDER_USERINFO_URL").unwrap_or_else(|_| {
                "https://graph.facebook.com/me?fields=id,name,email,picture,gender".to_string()
            }),
            oauth_client_id: env::var("OAUTH_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("OAUTH_CLIENT_ID"))?,
            oauth_client_secret: env::var("OAUTH_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("OAUTH_CLIENT_SECRET"))?,
            oauth_scope: env::var("OAUTH_SCOPE")
                .unwrap_or_else(|_| "public_profile,email".to_string()),
            oauth_state_key: env::var("OAUTH_STATE_KEY")
                .map_err(|_| ConfigError::Missing("OAUTH_STATE_KEY"))?
                .into_bytes(),

            vendor_scripts: env::var("VENDOR_SCRIPTS")
                .map(|v| parse_script_list(&v))
                .unwrap_or_else(|_| default_vendor_scripts()),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            storage_backend: BackendKind::Local,
            gcp_project_id: "test-project".to_string(),
            local_store_path: "target/test-store.json".into(),
            provider_auth_url: "https://provider.example/dialog/oauth".to_string(),
            provider_token_url: "https://provider.example/oauth/access_token".to_string(),
            provider_userinfo_url: "https://provider.example/me".to_string(),
            oauth_client_id: "test_client_id".to_string(),
            oauth_client_secret: "test_secret".to_string(),
            oauth_scope: "public_profile,email".to_string(),
            oauth_state_key: b"test_state_key_32_bytes_minimum!".to_vec(),
            vendor_scripts: default_vendor_scripts(),
        }
    }
}

/// Scripts the shell page pulls in when nothing is configured.
fn default_vendor_scripts() -> Vec<String> {
    vec![
        "https://code.jquery.com/jquery-3.2.1.min.js".to_string(),
        "https://cdnjs.cloudflare.com/ajax/libs/materialize/0.100.2/js/materialize.min.js"
            .to_string(),
    ]
}

fn parse_script_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
