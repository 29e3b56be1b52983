//! Profile handlers (bearer token required).

use axum::{extract::Extension, response::Json, routing::get, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use common::AppResult;
use domain::UserProfile;

use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Profile of the authenticated user
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    #[schema(example = "user retrieved successfully!")]
    pub message: String,
    pub user: UserProfile,
}

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(read_user_profile))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = ProfileResponse),
        (status = 401, description = "Missing, invalid or expired token")
    )
)]
pub async fn read_user_profile(
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ProfileResponse>> {
    Ok(Json(ProfileResponse {
        message: "user retrieved successfully!".to_string(),
        user: current_user.profile(),
    }))
}
