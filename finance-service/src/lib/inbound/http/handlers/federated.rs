use axum::extract::Query;
use axum::extract::State;
use axum::response::Redirect;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::ApiError;
use crate::federation::models::CallbackParams;
use crate::inbound::http::router::AppState;

/// Cookie binding the state token to the user agent.
pub const STATE_COOKIE: &str = "oauthstate";

const STATE_COOKIE_MAX_AGE_SECS: i64 = 300;

/// Start a federated login: set the state cookie and send the user agent to
/// the provider (307).
pub async fn google_login(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let start = state.federated_login.start();

    let cookie = Cookie::build((STATE_COOKIE, start.state.as_str().to_string()))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(STATE_COOKIE_MAX_AGE_SECS))
        .build();

    (
        jar.add(cookie),
        Redirect::temporary(&start.authorization_url),
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    state: Option<String>,
    code: Option<String>,
}

/// Complete a federated login and redirect to the landing page with the
/// session token (303).
pub async fn oauth_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<(CookieJar, Redirect), ApiError> {
    let cookie_state = jar.get(STATE_COOKIE).map(|c| c.value().to_string());

    let outcome = state
        .federated_login
        .complete(
            CallbackParams {
                state: query.state,
                code: query.code,
            },
            cookie_state,
        )
        .await
        .map_err(ApiError::from)?;

    let jar = jar.remove(Cookie::build(STATE_COOKIE).path("/"));

    Ok((jar, Redirect::to(&outcome.redirect_url)))
}
