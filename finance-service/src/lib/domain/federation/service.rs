use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::StateToken;
use auth::StateTokenGenerator;
use reqwest::Url;

use crate::domain::federation::errors::FederationError;
use crate::domain::federation::models::CallbackParams;
use crate::domain::federation::models::FederatedLoginOutcome;
use crate::domain::federation::models::FederatedLoginStart;
use crate::domain::federation::ports::FederatedLoginPort;
use crate::domain::federation::ports::IdentityProvider;
use crate::domain::identity::ports::IdentityServicePort;

/// Orchestrates the authorization-code flow against an identity provider.
///
/// Callback handling runs strictly in order: state check, code exchange,
/// profile fetch, identity resolution, token issuance. Each step only runs
/// once the previous one succeeded.
pub struct FederatedLoginService<P, S>
where
    P: IdentityProvider,
    S: IdentityServicePort,
{
    provider: Arc<P>,
    identity_service: Arc<S>,
    authenticator: Arc<Authenticator>,
    state_generator: StateTokenGenerator,
    landing_url: Url,
}

impl<P, S> FederatedLoginService<P, S>
where
    P: IdentityProvider,
    S: IdentityServicePort,
{
    /// Create a new federated login service.
    ///
    /// # Arguments
    /// * `provider` - Identity provider client
    /// * `identity_service` - Local identity resolution
    /// * `authenticator` - Session token issuance
    /// * `landing_url` - Application page receiving the session token
    pub fn new(
        provider: Arc<P>,
        identity_service: Arc<S>,
        authenticator: Arc<Authenticator>,
        landing_url: Url,
    ) -> Self {
        Self {
            provider,
            identity_service,
            authenticator,
            state_generator: StateTokenGenerator::new(),
            landing_url,
        }
    }

    fn check_state(
        params: &CallbackParams,
        cookie_state: Option<String>,
    ) -> Result<(), FederationError> {
        let (Some(expected), Some(presented)) = (cookie_state, params.state.as_deref()) else {
            return Err(FederationError::InvalidState);
        };

        if !expected.is_empty() && StateToken::from(expected).matches(presented) {
            Ok(())
        } else {
            Err(FederationError::InvalidState)
        }
    }

    fn landing_url_with_token(&self, token: &str) -> String {
        let mut url = self.landing_url.clone();
        url.query_pairs_mut().append_pair("token", token);
        url.to_string()
    }
}

#[async_trait]
impl<P, S> FederatedLoginPort for FederatedLoginService<P, S>
where
    P: IdentityProvider,
    S: IdentityServicePort,
{
    fn start(&self) -> FederatedLoginStart {
        let state = self.state_generator.generate();
        let authorization_url = self.provider.authorization_url(state.as_str());

        FederatedLoginStart {
            state,
            authorization_url,
        }
    }

    async fn complete(
        &self,
        params: CallbackParams,
        cookie_state: Option<String>,
    ) -> Result<FederatedLoginOutcome, FederationError> {
        if let Err(e) = Self::check_state(&params, cookie_state) {
            tracing::warn!("Federated callback rejected: state mismatch");
            return Err(e);
        }

        let code = params.code.unwrap_or_default();
        let access_token = self.provider.exchange_code(&code).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Federated callback rejected: code exchange failed");
        })?;

        let profile = self
            .provider
            .fetch_profile(&access_token)
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, "Federated callback failed: user info unavailable");
            })?;

        let identity = self.identity_service.find_or_provision(profile).await?;

        let token = self
            .authenticator
            .issue_token(identity.email.as_str(), identity.id.value())
            .map_err(|e| FederationError::TokenIssuance(e.to_string()))?;

        tracing::info!(identity_id = %identity.id, "Federated login completed");

        let redirect_url = self.landing_url_with_token(&token);

        Ok(FederatedLoginOutcome {
            identity,
            token,
            redirect_url,
        })
    }
}
