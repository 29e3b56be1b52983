//! REST client for the Supabase GoTrue identity provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use domain::{IdentityUser, Session};

#[cfg(test)]
use mockall::automock;

/// Failure talking to the identity provider.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("identity provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected identity provider response: {0}")]
    Malformed(String),
}

/// Result type for identity provider calls
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Signup data forwarded to the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SignUpParams {
    pub email: String,
    pub password: String,
    pub display_name: String,
    /// Confirmation link target
    pub redirect_to: Option<String>,
}

/// Identity provider operations used by the API.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account, storing the display name as user metadata
    async fn sign_up(&self, params: SignUpParams) -> IdentityResult<IdentityUser>;

    /// Exchange e-mail and password for a session
    async fn sign_in_with_password(&self, email: &str, password: &str) -> IdentityResult<Session>;

    /// Send a password reset e-mail
    async fn reset_password_email(
        &self,
        email: &str,
        redirect_to: Option<String>,
    ) -> IdentityResult<()>;

    /// Resolve the user owning an access token
    async fn get_user(&self, access_token: &str) -> IdentityResult<IdentityUser>;

    /// Check that the provider is reachable
    async fn health(&self) -> IdentityResult<()>;
}

#[derive(Serialize)]
struct SignUpBody<'a> {
    email: &'a str,
    password: &'a str,
    data: SignUpMetadata<'a>,
}

#[derive(Serialize)]
struct SignUpMetadata<'a> {
    display_name: &'a str,
}

#[derive(Serialize)]
struct PasswordCredentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RecoverBody<'a> {
    email: &'a str,
}

/// GoTrue REST client.
pub struct SupabaseAuthClient {
    http: Client,
    auth_url: String,
    api_key: String,
}

impl SupabaseAuthClient {
    /// Create a client for a project URL such as `https://<ref>.supabase.co`.
    pub fn new(
        project_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> IdentityResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        let auth_url = format!("{}/auth/v1", project_url.trim_end_matches('/'));
        debug!("Identity provider endpoint: {}", auth_url);

        Ok(Self {
            http,
            auth_url,
            api_key: api_key.into(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/{}", self.auth_url, path))
            .header("apikey", &self.api_key)
    }

    /// Request made on behalf of the project rather than a user.
    fn project_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request(method, path).bearer_auth(&self.api_key)
    }

    async fn execute(request: RequestBuilder) -> IdentityResult<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(rejection(status, &body));
        }

        Ok(body)
    }

    async fn execute_json<T: DeserializeOwned>(request: RequestBuilder) -> IdentityResult<T> {
        let body = Self::execute(request).await?;
        serde_json::from_str(&body).map_err(|e| IdentityError::Malformed(e.to_string()))
    }
}

/// Build a rejection from an error body, preferring the provider's own message.
fn rejection(status: StatusCode, body: &str) -> IdentityError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["msg", "message", "error_description", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request rejected")
                .to_string()
        });

    IdentityError::Rejected {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAuthClient {
    async fn sign_up(&self, params: SignUpParams) -> IdentityResult<IdentityUser> {
        debug!("Signing up {}", params.email);

        let mut request = self.project_request(Method::POST, "signup");
        if let Some(redirect_to) = &params.redirect_to {
            request = request.query(&[("redirect_to", redirect_to)]);
        }
        let request = request.json(&SignUpBody {
            email: &params.email,
            password: &params.password,
            data: SignUpMetadata {
                display_name: &params.display_name,
            },
        });

        // Auto-confirming projects answer with a session carrying the user
        let value: Value = Self::execute_json(request).await?;
        let nested = value.get("user").filter(|u| u.is_object()).cloned();
        let user = nested.unwrap_or(value);

        serde_json::from_value(user).map_err(|e| IdentityError::Malformed(e.to_string()))
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> IdentityResult<Session> {
        debug!("Password sign-in for {}", email);

        let request = self
            .project_request(Method::POST, "token")
            .query(&[("grant_type", "password")])
            .json(&PasswordCredentials { email, password });

        Self::execute_json(request).await
    }

    async fn reset_password_email(
        &self,
        email: &str,
        redirect_to: Option<String>,
    ) -> IdentityResult<()> {
        debug!("Password reset requested for {}", email);

        let mut request = self.project_request(Method::POST, "recover");
        if let Some(redirect_to) = &redirect_to {
            request = request.query(&[("redirect_to", redirect_to)]);
        }

        Self::execute(request.json(&RecoverBody { email })).await?;
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> IdentityResult<IdentityUser> {
        let request = self.request(Method::GET, "user").bearer_auth(access_token);
        Self::execute_json(request).await
    }

    async fn health(&self) -> IdentityResult<()> {
        Self::execute(self.request(Method::GET, "health")).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USER_ID: &str = "8c7d9a2e-4a4b-4d7f-9a51-2f0e4c1b5d10";

    fn client(server: &MockServer) -> SupabaseAuthClient {
        SupabaseAuthClient::new(&server.uri(), "anon-key", Duration::from_secs(5)).unwrap()
    }

    fn user_json() -> Value {
        json!({
            "id": USER_ID,
            "aud": "authenticated",
            "email": "ada@example.com",
            "user_metadata": { "display_name": "Ada" }
        })
    }

    fn signup_params(redirect_to: Option<&str>) -> SignUpParams {
        SignUpParams {
            email: "ada@example.com".to_string(),
            password: "correct horse".to_string(),
            display_name: "Ada".to_string(),
            redirect_to: redirect_to.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_sign_up_forwards_metadata_and_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .and(query_param("redirect_to", "https://app.example.com/welcome"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer anon-key"))
            .and(body_json(json!({
                "email": "ada@example.com",
                "password": "correct horse",
                "data": { "display_name": "Ada" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .expect(1)
            .mount(&server)
            .await;

        let user = client(&server)
            .sign_up(signup_params(Some("https://app.example.com/welcome")))
            .await
            .unwrap();

        assert_eq!(user.id.to_string(), USER_ID);
        assert_eq!(user.display_name(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_sign_up_accepts_session_shaped_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "token",
                "token_type": "bearer",
                "user": user_json()
            })))
            .mount(&server)
            .await;

        let user = client(&server).sign_up(signup_params(None)).await.unwrap();
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn test_sign_up_rejection_uses_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "code": 422,
                "error_code": "user_already_exists",
                "msg": "User already registered"
            })))
            .mount(&server)
            .await;

        let err = client(&server).sign_up(signup_params(None)).await.unwrap_err();
        assert!(matches!(err, IdentityError::Rejected { status: 422, .. }));
        assert_eq!(err.to_string(), "User already registered");
    }

    #[tokio::test]
    async fn test_sign_in_parses_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(body_json(json!({
                "email": "ada@example.com",
                "password": "correct horse"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "access-123",
                "token_type": "bearer",
                "expires_in": 3600,
                "refresh_token": "refresh-456",
                "user": user_json()
            })))
            .mount(&server)
            .await;

        let session = client(&server)
            .sign_in_with_password("ada@example.com", "correct horse")
            .await
            .unwrap();

        assert_eq!(session.access_token, "access-123");
        assert_eq!(session.expires_in, Some(3600));
        assert_eq!(session.user.display_name(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_sign_in_oauth_style_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .sign_in_with_password("ada@example.com", "wrong")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid login credentials");
    }

    #[tokio::test]
    async fn test_reset_password_without_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/recover"))
            .and(body_json(json!({ "email": "ada@example.com" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .reset_password_email("ada@example.com", None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_user_sends_user_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", "Bearer user-token"))
            .and(header("apikey", "anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .mount(&server)
            .await;

        let user = client(&server).get_user("user-token").await.unwrap();
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn test_get_user_expired_token_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "code": 403,
                "error_code": "bad_jwt",
                "msg": "invalid JWT: token is expired"
            })))
            .mount(&server)
            .await;

        let err = client(&server).get_user("stale").await.unwrap_err();
        assert!(matches!(err, IdentityError::Rejected { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_undecodable_user_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = client(&server).get_user("token").await.unwrap_err();
        assert!(matches!(err, IdentityError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_plain_text_error_body_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/health"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream connect error"))
            .mount(&server)
            .await;

        let err = client(&server).health().await.unwrap_err();
        assert_eq!(err.to_string(), "upstream connect error");
    }
}
