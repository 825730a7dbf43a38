// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider sign-in routes (redirect-based flow).
//!
//! The completion of the flow is observed here, on the way back from the
//! provider; success and failure are both forwarded to the adapter as auth
//! events. A failed redirect never takes the page down - the handler always
//! answers with a redirect to the frontend and sign-in stays retryable.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::adapter::AuthEvent;
use crate::error::{AppError, Result};
use crate::models::UserProfile;
use crate::AppState;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signin", get(auth_start))
        .route("/auth/callback", get(auth_callback))
}

/// Query parameters for starting the sign-in flow.
#[derive(Deserialize)]
pub struct AuthStartParams {
    /// Frontend URL to redirect back to after sign-in completes.
    /// If not provided, uses FRONTEND_URL env var.
    #[serde(default)]
    redirect_uri: Option<String>,
}

/// Start the sign-in flow - redirect to the identity provider.
async fn auth_start(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuthStartParams>,
    headers: axum::http::HeaderMap,
) -> Result<Redirect> {
    let frontend_url = params
        .redirect_uri
        .unwrap_or_else(|| state.config.frontend_url.clone());

    let oauth_state = sign_state(&frontend_url, &state.config.oauth_state_key)?;
    let callback_url = callback_url_from(&headers);
    let auth_url = state.identity.authorize_url(&callback_url, &oauth_state);

    tracing::info!(
        frontend_url = %frontend_url,
        "Starting sign-in, redirecting to identity provider"
    );

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Sign-in callback - exchange the code, deliver the profile, return to the
/// frontend.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    // Decode and verify frontend URL from state parameter
    let frontend_url = params
        .state
        .as_deref()
        .and_then(|s| verify_and_decode_state(s, &state.config.oauth_state_key))
        .unwrap_or_else(|| {
            tracing::warn!(
                "Invalid or tampered state parameter, falling back to default frontend URL"
            );
            state.config.frontend_url.clone()
        });

    // Provider-reported errors (user denied, expired dialog, ...)
    if let Some(error) = params.error {
        report_failure(&state, "provider_error", &error);
        return Redirect::temporary(&format!(
            "{}?error={}",
            frontend_url,
            urlencoding::encode(&error)
        ));
    }

    let Some(code) = params.code else {
        report_failure(&state, "missing_code", "Callback carried no authorization code");
        return Redirect::temporary(&format!("{}?error=missing_code", frontend_url));
    };

    tracing::info!("Exchanging authorization code for tokens");

    let callback_url = callback_url_from(&headers);
    let profile = match exchange_and_fetch(&state, &code, &callback_url).await {
        Ok(profile) => profile,
        Err(e) => {
            report_failure(&state, "exchange_failed", &e.to_string());
            return Redirect::temporary(&format!("{}?error=sign_in_failed", frontend_url));
        }
    };

    tracing::info!(
        user_uid = %profile.user_uid,
        identifier = %profile.identifier,
        "Sign-in successful"
    );

    let _ = state.auth_events.send(AuthEvent::SignedIn { profile });

    Redirect::temporary(&frontend_url)
}

/// Exchange the code for an access token and fetch the subject's profile.
/// The token is dropped after the fetch.
async fn exchange_and_fetch(
    state: &Arc<AppState>,
    code: &str,
    callback_url: &str,
) -> Result<UserProfile> {
    let access_token = state.identity.exchange_code(code, callback_url).await?;
    state.identity.fetch_profile(&access_token).await
}

/// Forward a sign-in failure to the adapter instead of discarding it.
fn report_failure(state: &Arc<AppState>, code: &str, message: &str) {
    tracing::warn!(code = %code, error = %message, "Sign-in flow failed");
    let _ = state.auth_events.send(AuthEvent::SignInFailed {
        code: code.to_string(),
        message: message.to_string(),
    });
}

/// Derive the callback URL from the request host.
fn callback_url_from(headers: &axum::http::HeaderMap) -> String {
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| {
            std::env::var("API_HOST").unwrap_or_else(|_| "localhost:8080".to_string())
        });

    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    };

    format!("{}://{}/auth/callback", scheme, host)
}

/// Sign the frontend URL + timestamp into the OAuth state parameter.
fn sign_state(frontend_url: &str, secret: &[u8]) -> Result<String> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis();

    // Create the data payload: "frontend_url|timestamp_hex"
    let payload = format!("{}|{:x}", frontend_url, timestamp);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    // Combine payload + signature: "payload|signature_hex"
    let signed_state = format!("{}|{}", payload, hex::encode(signature));

    Ok(URL_SAFE_NO_PAD.encode(signed_state.as_bytes()))
}

/// Verify HMAC signature and decode the frontend URL from the OAuth state parameter.
fn verify_and_decode_state(state: &str, secret: &[u8]) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Format is "frontend_url|timestamp_hex|signature_hex"
    let parts: Vec<&str> = state_str.splitn(3, '|').collect();
    if parts.len() != 3 {
        return None;
    }

    let frontend_url = parts[0];
    let timestamp_hex = parts[1];
    let signature_hex = parts[2];

    // Reconstruct payload and verify signature
    let payload = format!("{}|{}", frontend_url, timestamp_hex);

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());

    let expected_signature = hex::encode(mac.finalize().into_bytes());

    if signature_hex != expected_signature {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    Some(frontend_url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_roundtrip() {
        let secret = b"secret_key";
        let frontend_url = "https://example.com";

        let state = sign_state(frontend_url, secret).unwrap();
        let result = verify_and_decode_state(&state, secret);

        assert_eq!(result, Some(frontend_url.to_string()));
    }

    #[test]
    fn test_state_invalid_signature() {
        let secret = b"secret_key";
        let payload = format!("{}|{:x}", "https://example.com", 1234567890u128);
        let state_data = format!("{}|{}", payload, "invalid_signature");
        let encoded_state = URL_SAFE_NO_PAD.encode(state_data.as_bytes());

        let result = verify_and_decode_state(&encoded_state, secret);
        assert_eq!(result, None);
    }

    #[test]
    fn test_state_wrong_secret() {
        let secret = b"secret_key";
        let wrong_secret = b"wrong_key";

        let state = sign_state("https://example.com", secret).unwrap();
        let result = verify_and_decode_state(&state, wrong_secret);

        assert_eq!(result, None);
    }

    #[test]
    fn test_state_malformed() {
        let secret = b"secret_key";
        let encoded_state = URL_SAFE_NO_PAD.encode("invalid|format");

        let result = verify_and_decode_state(&encoded_state, secret);
        assert_eq!(result, None);
    }

    #[test]
    fn test_callback_url_scheme() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(
            axum::http::header::HOST,
            "localhost:8080".parse().unwrap(),
        );
        assert_eq!(
            callback_url_from(&headers),
            "http://localhost:8080/auth/callback"
        );

        headers.insert(
            axum::http::header::HOST,
            "wodboard.example.com".parse().unwrap(),
        );
        assert_eq!(
            callback_url_from(&headers),
            "https://wodboard.example.com/auth/callback"
        );
    }
}
