// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider client for the redirect-based sign-in flow.
//!
//! Handles:
//! - Building the authorization redirect URL
//! - Exchanging the callback code for an access token
//! - Fetching the signed-in subject's profile
//!
//! The access token is used for the profile fetch and then dropped; this
//! layer keeps no credentials.

use serde::Deserialize;

use crate::config::Config;
use crate::error::AppError;
use crate::models::UserProfile;

/// OAuth client for the configured identity provider.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    auth_url: String,
    token_url: String,
    userinfo_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
}

impl IdentityClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth_url: config.provider_auth_url.clone(),
            token_url: config.provider_token_url.clone(),
            userinfo_url: config.provider_userinfo_url.clone(),
            client_id: config.oauth_client_id.clone(),
            client_secret: config.oauth_client_secret.clone(),
            scope: config.oauth_scope.clone(),
        }
    }

    /// Authorization URL the sign-in redirect targets.
    pub fn authorize_url(&self, callback_url: &str, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            self.auth_url,
            self.client_id,
            urlencoding::encode(callback_url),
            urlencoding::encode(&self.scope),
            state
        )
    }

    /// Exchange the authorization code for an access token.
    pub async fn exchange_code(&self, code: &str, callback_url: &str) -> Result<String, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", callback_url),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::IdentityApi(format!("Token exchange request failed: {}", e)))?;

        let token: TokenResponse = self.check_response_json(response).await?;
        Ok(token.access_token)
    }

    /// Fetch the authenticated subject's profile.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile, AppError> {
        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::IdentityApi(e.to_string()))?;

        let profile: ProviderProfile = self.check_response_json(response).await?;
        Ok(profile.into())
    }

    /// Check response status and deserialize the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::IdentityApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::IdentityApi(format!("Invalid provider response: {}", e)))
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Userinfo shape across providers: `sub` for OIDC-style endpoints, `id` for
/// graph-style ones; `picture` is either a plain URL or a nested object.
#[derive(Deserialize)]
struct ProviderProfile {
    #[serde(alias = "sub")]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    picture: Option<ProviderPicture>,
    #[serde(default)]
    gender: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProviderPicture {
    Url(String),
    Graph { data: PictureData },
}

#[derive(Deserialize)]
struct PictureData {
    url: String,
}

impl ProviderPicture {
    fn into_url(self) -> String {
        match self {
            ProviderPicture::Url(url) => url,
            ProviderPicture::Graph { data } => data.url,
        }
    }
}

impl From<ProviderProfile> for UserProfile {
    fn from(profile: ProviderProfile) -> Self {
        UserProfile {
            display_name: profile.name.unwrap_or_default(),
            profile_pic: profile.picture.map(ProviderPicture::into_url),
            identifier: profile.email.unwrap_or_else(|| profile.id.clone()),
            user_uid: profile.id,
            gender: profile.gender,
        }
    }
}
