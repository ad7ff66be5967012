use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::Url;
use serde::Deserialize;

use crate::config::GoogleConfig;
use crate::domain::federation::errors::FederationError;
use crate::domain::federation::models::ProviderAccessToken;
use crate::domain::federation::ports::IdentityProvider;
use crate::domain::identity::models::DisplayName;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::FederatedProfile;

const SCOPES: &str =
    "https://www.googleapis.com/auth/userinfo.email https://www.googleapis.com/auth/userinfo.profile";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    email: String,
    name: Option<String>,
}

/// Google OAuth 2.0 client for the authorization-code flow.
pub struct GoogleIdentityProvider {
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_url: String,
    auth_url: Url,
    token_url: Url,
    userinfo_url: Url,
}

impl GoogleIdentityProvider {
    /// Build the client from configuration.
    ///
    /// # Errors
    /// Fails when an endpoint URL does not parse or the HTTP client cannot be built.
    pub fn new(config: &GoogleConfig) -> Result<Self, anyhow::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_url: config.redirect_url.clone(),
            auth_url: Url::parse(&config.auth_url)?,
            token_url: Url::parse(&config.token_url)?,
            userinfo_url: Url::parse(&config.userinfo_url)?,
        })
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    fn authorization_url(&self, state: &str) -> String {
        let mut url = self.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_url)
            .append_pair("response_type", "code")
            .append_pair("scope", SCOPES)
            .append_pair("state", state)
            .append_pair("access_type", "offline");
        url.to_string()
    }

    async fn exchange_code(&self, code: &str) -> Result<ProviderAccessToken, FederationError> {
        let response = self
            .client
            .post(self.token_url.clone())
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| FederationError::TokenExchange(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = %status, body = %body, "Token endpoint rejected code");
            return Err(FederationError::TokenExchange(format!(
                "token endpoint answered {}",
                status
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| FederationError::TokenExchange(e.to_string()))?;

        Ok(ProviderAccessToken(token.access_token))
    }

    async fn fetch_profile(
        &self,
        access_token: &ProviderAccessToken,
    ) -> Result<FederatedProfile, FederationError> {
        let response = self
            .client
            .get(self.userinfo_url.clone())
            .bearer_auth(&access_token.0)
            .send()
            .await
            .map_err(|e| FederationError::UserInfo(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FederationError::UserInfo(format!(
                "userinfo endpoint answered {}",
                status
            )));
        }

        let info: UserInfoResponse = response
            .json()
            .await
            .map_err(|e| FederationError::UserInfo(e.to_string()))?;

        let email =
            EmailAddress::new(info.email).map_err(|e| FederationError::UserInfo(e.to_string()))?;

        // Providers may omit the name; fall back to the email local part.
        let name = info
            .name
            .and_then(|name| DisplayName::new(name).ok())
            .map_or_else(|| DisplayName::new(email.local_part().to_string()), Ok)
            .map_err(|e| FederationError::UserInfo(e.to_string()))?;

        Ok(FederatedProfile { name, email })
    }
}
