//! OpenAPI document for the auth surface.

use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::signup::signup,
        super::login::login_start,
        super::login::login_verify,
        super::login::login_resend,
    ),
    components(schemas(
        super::signup::SignupRequest,
        super::signup::SignupResponse,
        super::login::LoginStartRequest,
        super::login::LoginStartResponse,
        super::login::LoginVerifyRequest,
        super::login::SessionResponse,
        super::login::LoginResendRequest,
        super::login::LoginResendResponse,
    )),
    tags((name = "auth", description = "Signup and two-stage login"))
)]
pub struct ApiDoc;

pub async fn openapi() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_the_auth_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/v1/auth/signup"));
        assert!(paths.contains_key("/v1/auth/login/start"));
        assert!(paths.contains_key("/v1/auth/login/verify"));
        assert!(paths.contains_key("/v1/auth/login/resend"));
    }
}
