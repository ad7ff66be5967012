use auth::StateToken;

use crate::domain::identity::models::Identity;

/// Access token returned by the identity provider's token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAccessToken(pub String);

/// Outbound half of a federated login attempt.
#[derive(Debug, Clone)]
pub struct FederatedLoginStart {
    /// Token to bind to the user agent through the state cookie
    pub state: StateToken,
    /// Provider authorization endpoint carrying the same token
    pub authorization_url: String,
}

/// Parameters the identity provider appends to the callback URL.
#[derive(Debug, Clone, Default)]
pub struct CallbackParams {
    pub state: Option<String>,
    pub code: Option<String>,
}

/// Completed federated login.
#[derive(Debug, Clone)]
pub struct FederatedLoginOutcome {
    pub identity: Identity,
    pub token: String,
    /// Landing URL carrying the session token
    pub redirect_url: String,
}
