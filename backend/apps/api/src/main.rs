//! `api` binary
//!
//! Reads configuration from the environment (and `.env`), picks the user
//! store, and serves the authentication routes. Startup failures are
//! `anyhow` errors; request failures go through `auth::AppError`.

mod config;

use anyhow::Context;
use auth::{
    InMemoryUserRepository, OAuthClient, PgUserRepository, ProviderRegistry, ProviderSpec,
    auth_router, auth_router_generic,
};
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use sqlx::postgres::PgPoolOptions;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{AppEnv, ServerConfig};

const DB_MAX_CONNECTIONS: u32 = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env()?;
    tracing::info!(
        app_env = ?config.app_env,
        github = config.auth.github.is_configured(),
        google = config.auth.google.is_configured(),
        "Configuration loaded"
    );

    let app = build_app(&config)
        .await?
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.frontend_origins));

    let listener = tokio::net::TcpListener::bind(config.server_address)
        .await
        .with_context(|| format!("cannot bind {}", config.server_address))?;
    tracing::info!(address = %config.server_address, "Listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// `RUST_LOG` wins; otherwise debug in development and info in production
fn init_tracing() {
    let level = match std::env::var("APP_ENV").as_deref().map(str::trim) {
        Ok("production" | "prod") => "info",
        _ => "debug",
    };
    let fallback = format!("api={level},auth={level},kernel={level},tower_http={level}");

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn build_app(config: &ServerConfig) -> anyhow::Result<Router> {
    // Both providers are always routed; an unconfigured one answers 500
    let providers = ProviderRegistry::new()
        .with(OAuthClient::new(ProviderSpec::github(), config.auth.github.clone())?)
        .with(OAuthClient::new(ProviderSpec::google(), config.auth.google.clone())?);

    let Some(database_url) = &config.database_url else {
        debug_assert_eq!(config.app_env, AppEnv::Development);
        tracing::warn!("DATABASE_URL not set, users are kept in memory");
        return Ok(auth_router_generic(
            InMemoryUserRepository::new(),
            providers,
            config.auth.clone(),
        ));
    };

    let pool = PgPoolOptions::new()
        .max_connections(DB_MAX_CONNECTIONS)
        .connect(database_url)
        .await
        .context("cannot connect to DATABASE_URL")?;
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await
        .context("database migration failed")?;
    tracing::info!("Database ready");

    Ok(auth_router(
        PgUserRepository::new(pool),
        providers,
        config.auth.clone(),
    ))
}

/// Credentialed CORS for the configured frontend origins
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring unparsable frontend origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn in_memory_app() -> Router {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        build_app(&config).await.unwrap()
    }

    async fn call(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    #[tokio::test]
    async fn test_development_app_serves_from_memory() {
        let req = Request::post("/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"username":"alice","password":"longenough1"}"#))
            .unwrap();

        let (status, body) = call(in_memory_app().await, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice");
    }

    #[tokio::test]
    async fn test_unconfigured_provider_is_500() {
        let req = Request::get("/auth/github/login").body(Body::empty()).unwrap();

        let (status, body) = call(in_memory_app().await, req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": "OAuth provider is not configured" }));
    }
}
