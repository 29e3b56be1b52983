//! Authentication handlers.
//!
//! Each handler forwards the validated payload to the identity provider and
//! turns any provider failure into a 400 with a prefixed message.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::Validate;

use common::{AppError, AppResult};

use crate::clients::SignUpParams;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// User signup request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// User password
    #[schema(example = "correct horse battery staple")]
    pub password: String,
    /// Name shown on the profile
    #[schema(example = "Ada")]
    pub display_name: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// User password
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

/// Password reset request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    /// Account email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
}

/// Signup confirmation echoing the submitted identity
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    #[schema(example = "User signed up successfully")]
    pub message: String,
    pub email: String,
    pub display_name: String,
}

/// Login result carrying the provider's access token and user metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "login successfully")]
    pub message: String,
    pub auth_token: String,
    #[schema(value_type = Object)]
    pub user: Map<String, Value>,
}

/// Plain message response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "Authentication",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "User signed up", body = SignupResponse),
        (status = 400, description = "Validation error or signup rejected")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> AppResult<Json<SignupResponse>> {
    let params = SignUpParams {
        email: payload.email.clone(),
        password: payload.password,
        display_name: payload.display_name.clone(),
        redirect_to: state.config.signup_redirect_url.clone(),
    };

    state
        .identity
        .sign_up(params)
        .await
        .map_err(|e| AppError::bad_request(format!("Signup failed: {}", e)))?;

    Ok(Json(SignupResponse {
        message: "User signed up successfully".to_string(),
        email: payload.email,
        display_name: payload.display_name,
    }))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error or invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let session = state
        .identity
        .sign_in_with_password(&payload.email, &payload.password)
        .await
        .map_err(|e| AppError::bad_request(format!("Login failed: {}", e)))?;

    Ok(Json(LoginResponse {
        message: "login successfully".to_string(),
        auth_token: session.access_token,
        user: session.user.user_metadata,
    }))
}

/// Send a password reset email
#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    tag = "Authentication",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset email sent", body = MessageResponse),
        (status = 400, description = "Validation error or reset rejected")
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .identity
        .reset_password_email(
            &payload.email,
            state.config.password_reset_redirect_url.clone(),
        )
        .await
        .map_err(|e| AppError::bad_request(format!("Password reset failed: {}", e)))?;

    Ok(Json(MessageResponse {
        message: format!("password reset email sent to {}", payload.email),
    }))
}
