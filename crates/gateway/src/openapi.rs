//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::auth_handler::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, SignupRequest,
    SignupResponse,
};
use crate::handlers::profile_handler::ProfileResponse;
use domain::UserProfile;

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    info(title = "Health Atlas AI API"),
    paths(
        crate::handlers::auth_handler::signup,
        crate::handlers::auth_handler::login,
        crate::handlers::auth_handler::forgot_password,
        crate::handlers::profile_handler::read_user_profile,
    ),
    components(
        schemas(
            SignupRequest,
            SignupResponse,
            LoginRequest,
            LoginResponse,
            ForgotPasswordRequest,
            MessageResponse,
            ProfileResponse,
            UserProfile,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Signup, login and password reset"),
        (name = "Profile", description = "Authenticated user endpoints"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
