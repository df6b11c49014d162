//! Two-stage login endpoints: password verification, then the second factor.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::error_response;
use crate::auth::AuthEngine;

#[derive(ToSchema, Deserialize)]
pub struct LoginStartRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginStartResponse {
    /// Handle for the second-factor stage.
    pub login_id: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginVerifyRequest {
    pub login_id: String,
    pub code: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub email: String,
    pub token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResendRequest {
    pub login_id: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResendResponse {
    /// The stored code, re-delivered without rotation.
    pub two_factor_code: String,
}

#[utoipa::path(
    post,
    path = "/v1/auth/login/start",
    request_body = LoginStartRequest,
    responses(
        (status = 200, description = "Password accepted, second factor pending", body = LoginStartResponse),
        (status = 401, description = "Invalid password", body = String),
        (status = 404, description = "User not found", body = String),
        (status = 423, description = "Account locked", body = String),
    ),
    tag = "auth"
)]
pub async fn login_start(
    engine: Extension<Arc<AuthEngine>>,
    payload: Option<Json<LoginStartRequest>>,
) -> impl IntoResponse {
    let LoginStartRequest { email, password } = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let password = SecretString::from(password);
    match engine.login_start(email.trim(), &password).await {
        Ok(challenge) => (
            StatusCode::OK,
            Json(LoginStartResponse {
                login_id: challenge.login_id.to_string(),
            }),
        )
            .into_response(),
        Err(err) => error_response(&err).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/login/verify",
    request_body = LoginVerifyRequest,
    responses(
        (status = 200, description = "Authenticated", body = SessionResponse),
        (status = 401, description = "Invalid code or expired challenge", body = String),
    ),
    tag = "auth"
)]
pub async fn login_verify(
    engine: Extension<Arc<AuthEngine>>,
    payload: Option<Json<LoginVerifyRequest>>,
) -> impl IntoResponse {
    let request = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let Ok(login_id) = Uuid::parse_str(request.login_id.trim()) else {
        return (StatusCode::BAD_REQUEST, "Invalid login id".to_string()).into_response();
    };

    match engine.login_verify(login_id, request.code.trim()).await {
        Ok(session) => (
            StatusCode::OK,
            Json(SessionResponse {
                email: session.identity,
                token: session.token,
            }),
        )
            .into_response(),
        Err(err) => error_response(&err).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/login/resend",
    request_body = LoginResendRequest,
    responses(
        (status = 200, description = "Stored code re-delivered", body = LoginResendResponse),
        (status = 401, description = "Expired challenge", body = String),
    ),
    tag = "auth"
)]
pub async fn login_resend(
    engine: Extension<Arc<AuthEngine>>,
    payload: Option<Json<LoginResendRequest>>,
) -> impl IntoResponse {
    let request = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let Ok(login_id) = Uuid::parse_str(request.login_id.trim()) else {
        return (StatusCode::BAD_REQUEST, "Invalid login id".to_string()).into_response();
    };

    match engine.login_resend(login_id).await {
        Ok(code) => (
            StatusCode::OK,
            Json(LoginResendResponse {
                two_factor_code: code,
            }),
        )
            .into_response(),
        Err(err) => error_response(&err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{EngineConfig, SignUp};

    const EMAIL: &str = "a@b.com";
    const PASSWORD: &str = "password1";

    fn engine() -> Extension<Arc<AuthEngine>> {
        Extension(Arc::new(AuthEngine::with_defaults(EngineConfig::new())))
    }

    async fn signed_up(engine: &Extension<Arc<AuthEngine>>) -> SignUp {
        engine
            .sign_up(EMAIL, &SecretString::from(PASSWORD))
            .await
            .expect("signup")
    }

    fn start_request(password: &str) -> Option<Json<LoginStartRequest>> {
        Some(Json(LoginStartRequest {
            email: EMAIL.to_string(),
            password: password.to_string(),
        }))
    }

    #[tokio::test]
    async fn login_start_missing_payload() {
        let response = login_start(engine(), None).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_start_unknown_user() {
        let response = login_start(engine(), start_request(PASSWORD))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn login_start_wrong_password() {
        let engine = engine();
        signed_up(&engine).await;

        let response = login_start(engine, start_request("wrong-password"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_start_locked_after_three_failures() {
        let engine = engine();
        signed_up(&engine).await;

        for _ in 0..3 {
            login_start(engine.clone(), start_request("wrong-password")).await;
        }
        let response = login_start(engine, start_request(PASSWORD))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::LOCKED);
    }

    #[tokio::test]
    async fn login_verify_rejects_malformed_login_id() {
        let response = login_verify(
            engine(),
            Some(Json(LoginVerifyRequest {
                login_id: "not-a-uuid".to_string(),
                code: "ABC123".to_string(),
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_verify_grants_session_with_stored_code() {
        let engine = engine();
        let signup = signed_up(&engine).await;
        let challenge = engine
            .login_start(EMAIL, &SecretString::from(PASSWORD))
            .await
            .expect("login start");

        let wrong = login_verify(
            engine.clone(),
            Some(Json(LoginVerifyRequest {
                login_id: challenge.login_id.to_string(),
                code: "WRONG1".to_string(),
            })),
        )
        .await
        .into_response();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

        let right = login_verify(
            engine,
            Some(Json(LoginVerifyRequest {
                login_id: challenge.login_id.to_string(),
                code: signup.two_factor_code,
            })),
        )
        .await
        .into_response();
        assert_eq!(right.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn login_resend_re_delivers_without_a_session() {
        let engine = engine();
        signed_up(&engine).await;
        let challenge = engine
            .login_start(EMAIL, &SecretString::from(PASSWORD))
            .await
            .expect("login start");

        let response = login_resend(
            engine,
            Some(Json(LoginResendRequest {
                login_id: challenge.login_id.to_string(),
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn login_resend_unknown_challenge() {
        let response = login_resend(
            engine(),
            Some(Json(LoginResendRequest {
                login_id: Uuid::new_v4().to_string(),
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
