use std::sync::Arc;

use auth::Authenticator;
use finance_service::config::Config;
use finance_service::domain::federation::service::FederatedLoginService;
use finance_service::domain::identity::service::IdentityService;
use finance_service::domain::ledger::service::LedgerService;
use finance_service::inbound::http::router::create_router;
use finance_service::outbound::google::GoogleIdentityProvider;
use finance_service::outbound::repositories::PostgresIdentityRepository;
use finance_service::outbound::repositories::PostgresLedgerRepository;
use reqwest::Url;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finance_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "finance-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_validity_hours = config.jwt.expiration_hours,
        redirect_url = %config.google.redirect_url,
        landing_url = %config.frontend.landing_url,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(Authenticator::with_validity(
        config.jwt.secret.as_bytes(),
        chrono::Duration::hours(config.jwt.expiration_hours),
    )?);

    let identity_repository = Arc::new(PostgresIdentityRepository::new(pg_pool.clone()));
    let ledger_repository = Arc::new(PostgresLedgerRepository::new(pg_pool));
    let provider = Arc::new(GoogleIdentityProvider::new(&config.google)?);

    let identity_service = Arc::new(IdentityService::new(
        identity_repository,
        Arc::clone(&authenticator),
    ));
    let federated_login = Arc::new(FederatedLoginService::new(
        provider,
        Arc::clone(&identity_service),
        Arc::clone(&authenticator),
        Url::parse(&config.frontend.landing_url)?,
    ));
    let ledger_service = Arc::new(LedgerService::new(ledger_repository));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        identity_service,
        federated_login,
        ledger_service,
        authenticator,
    );

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
