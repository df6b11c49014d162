use anyhow::Result;
use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::auth::AuthEngine;

pub mod handlers;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "",
};

#[must_use]
pub fn router(engine: Arc<AuthEngine>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/openapi.json", get(handlers::openapi))
        .route("/v1/auth/signup", post(handlers::signup))
        .route("/v1/auth/login/start", post(handlers::login_start))
        .route("/v1/auth/login/verify", post(handlers::login_verify))
        .route("/v1/auth/login/resend", post(handlers::login_resend))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(engine))
}

/// Bind and serve until the process is terminated.
///
/// # Errors
/// Returns an error if the listener cannot bind or the server fails.
pub async fn new(port: u16, engine: Arc<AuthEngine>) -> Result<()> {
    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    axum::serve(listener, router(engine).into_make_service()).await?;

    Ok(())
}
