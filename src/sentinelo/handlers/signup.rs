//! Account registration endpoint.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::error_response;
use crate::auth::AuthEngine;

#[derive(ToSchema, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupResponse {
    pub email: String,
    /// Returned to the caller for out-of-band delivery to the user.
    pub two_factor_code: String,
}

#[utoipa::path(
    post,
    path = "/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created, code issued", body = SignupResponse),
        (status = 400, description = "Invalid identity or weak password", body = String),
        (status = 409, description = "Identity already registered", body = String),
    ),
    tag = "auth"
)]
pub async fn signup(
    engine: Extension<Arc<AuthEngine>>,
    payload: Option<Json<SignupRequest>>,
) -> impl IntoResponse {
    let SignupRequest { email, password } = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let password = SecretString::from(password);
    match engine.sign_up(email.trim(), &password).await {
        Ok(signup) => (
            StatusCode::CREATED,
            Json(SignupResponse {
                email: signup.identity,
                two_factor_code: signup.two_factor_code,
            }),
        )
            .into_response(),
        Err(err) => error_response(&err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::EngineConfig;

    fn engine() -> Extension<Arc<AuthEngine>> {
        Extension(Arc::new(AuthEngine::with_defaults(EngineConfig::new())))
    }

    fn request(email: &str, password: &str) -> Option<Json<SignupRequest>> {
        Some(Json(SignupRequest {
            email: email.to_string(),
            password: password.to_string(),
        }))
    }

    #[tokio::test]
    async fn signup_missing_payload() {
        let response = signup(engine(), None).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn signup_creates_account() {
        let response = signup(engine(), request("a@b.com", "password1"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn signup_rejects_invalid_email() {
        let response = signup(engine(), request("not-an-email", "password1"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn signup_rejects_short_password() {
        let response = signup(engine(), request("a@b.com", "1234567"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn signup_duplicate_conflicts() {
        let engine = engine();
        let first = signup(engine.clone(), request("a@b.com", "password1"))
            .await
            .into_response();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = signup(engine, request("a@b.com", "password1"))
            .await
            .into_response();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }
}
