use async_trait::async_trait;

use crate::domain::federation::errors::FederationError;
use crate::domain::federation::models::CallbackParams;
use crate::domain::federation::models::FederatedLoginOutcome;
use crate::domain::federation::models::FederatedLoginStart;
use crate::domain::federation::models::ProviderAccessToken;
use crate::domain::identity::models::FederatedProfile;

/// Port for the federated login flow.
#[async_trait]
pub trait FederatedLoginPort: Send + Sync + 'static {
    /// Begin a login attempt: draw a state token and build the provider
    /// authorization URL embedding it.
    fn start(&self) -> FederatedLoginStart;

    /// Finish a login attempt from the provider callback.
    ///
    /// # Arguments
    /// * `params` - `state` and `code` query parameters of the callback
    /// * `cookie_state` - State token read back from the user agent's cookie
    ///
    /// # Errors
    /// * `InvalidState` - State missing on either side or not equal
    /// * `TokenExchange` - Code could not be exchanged for an access token
    /// * `UserInfo` - Profile could not be fetched or parsed
    /// * `Identity` - Local identity lookup or provisioning failed
    /// * `TokenIssuance` - Session token signing failed
    async fn complete(
        &self,
        params: CallbackParams,
        cookie_state: Option<String>,
    ) -> Result<FederatedLoginOutcome, FederationError>;
}

/// Outbound operations against an OAuth 2.0 identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Authorization endpoint URL for the given state, requesting offline
    /// access with email and profile scopes.
    fn authorization_url(&self, state: &str) -> String;

    /// Exchange an authorization code at the token endpoint.
    ///
    /// # Errors
    /// * `TokenExchange` - Network failure, rejected code or client credentials
    async fn exchange_code(&self, code: &str) -> Result<ProviderAccessToken, FederationError>;

    /// Fetch the signed-in user's profile.
    ///
    /// # Errors
    /// * `UserInfo` - Network failure or unusable response
    async fn fetch_profile(
        &self,
        access_token: &ProviderAccessToken,
    ) -> Result<FederatedProfile, FederationError>;
}
