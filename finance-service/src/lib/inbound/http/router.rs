use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::budgets::create_budget;
use super::handlers::budgets::delete_budget;
use super::handlers::budgets::list_budgets;
use super::handlers::expenses::create_expense;
use super::handlers::expenses::delete_expense;
use super::handlers::expenses::list_expenses;
use super::handlers::expenses::update_expense_paid;
use super::handlers::federated::google_login;
use super::handlers::federated::oauth_callback;
use super::handlers::incomes::create_income;
use super::handlers::incomes::delete_income;
use super::handlers::incomes::list_incomes;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::users::get_user;
use super::handlers::users::update_email;
use super::handlers::users::update_password;
use super::handlers::users::update_username;
use super::middleware::authenticate as auth_middleware;
use crate::federation::ports::FederatedLoginPort;
use crate::identity::ports::IdentityServicePort;
use crate::ledger::ports::LedgerServicePort;

#[derive(Clone)]
pub struct AppState {
    pub identity_service: Arc<dyn IdentityServicePort>,
    pub federated_login: Arc<dyn FederatedLoginPort>,
    pub ledger_service: Arc<dyn LedgerServicePort>,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(
    identity_service: Arc<dyn IdentityServicePort>,
    federated_login: Arc<dyn FederatedLoginPort>,
    ledger_service: Arc<dyn LedgerServicePort>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        identity_service,
        federated_login,
        ledger_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/login/google", get(google_login))
        .route("/oauth2/callback", get(oauth_callback))
        .route("/register", post(register))
        .route("/login", post(login));

    let protected_routes = Router::new()
        .route("/users/:id", get(get_user))
        .route("/users/:id/username", put(update_username))
        .route("/users/:id/email", put(update_email))
        .route("/users/:id/password", put(update_password))
        .route("/expenses", post(create_expense).get(list_expenses))
        .route("/expenses/:id", delete(delete_expense))
        .route("/expenses/:id/paid", put(update_expense_paid))
        .route("/incomes", post(create_income).get(list_incomes))
        .route("/incomes/:id", delete(delete_income))
        .route("/budget", post(create_budget).get(list_budgets))
        .route("/budget/:id", delete(delete_budget))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Headers are left out of the span: they carry session tokens and cookies
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri().path(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri().path(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
