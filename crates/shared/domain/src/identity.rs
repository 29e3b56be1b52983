//! Identity types as returned by the external identity provider.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::constants::{DEFAULT_DISPLAY_NAME, METADATA_DISPLAY_NAME};

/// User record held by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityUser {
    pub id: Uuid,
    /// Absent for phone-only accounts
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Map<String, Value>,
}

impl IdentityUser {
    /// Display name stored in the user metadata, if any.
    pub fn display_name(&self) -> Option<&str> {
        self.user_metadata
            .get(METADATA_DISPLAY_NAME)
            .and_then(Value::as_str)
    }
}

/// Session issued after a successful password sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default, skip_serializing)]
    pub refresh_token: Option<String>,
    pub user: IdentityUser,
}

/// Profile view of an authenticated user (safe to return to client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserProfile {
    pub user_id: Uuid,
    #[cfg_attr(feature = "openapi", schema(example = "ada@example.com"))]
    pub email: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "Ada"))]
    pub display_name: String,
}

impl From<&IdentityUser> for UserProfile {
    fn from(user: &IdentityUser) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            display_name: user
                .display_name()
                .unwrap_or(DEFAULT_DISPLAY_NAME)
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_without_metadata_deserializes() {
        let user: IdentityUser = serde_json::from_value(json!({
            "id": "8c7d9a2e-4a4b-4d7f-9a51-2f0e4c1b5d10",
            "email": "ada@example.com",
            "aud": "authenticated"
        }))
        .unwrap();

        assert!(user.user_metadata.is_empty());
        assert_eq!(user.display_name(), None);
    }

    #[test]
    fn test_profile_falls_back_to_default_display_name() {
        let user = IdentityUser {
            id: Uuid::new_v4(),
            email: None,
            user_metadata: Map::new(),
        };

        let profile = UserProfile::from(&user);
        assert_eq!(profile.display_name, DEFAULT_DISPLAY_NAME);
        assert!(profile.email.is_none());
    }

    #[test]
    fn test_profile_uses_metadata_display_name() {
        let mut metadata = Map::new();
        metadata.insert("display_name".to_string(), json!("Ada"));
        let user = IdentityUser {
            id: Uuid::new_v4(),
            email: Some("ada@example.com".to_string()),
            user_metadata: metadata,
        };

        assert_eq!(UserProfile::from(&user).display_name, "Ada");
    }

    #[test]
    fn test_non_string_display_name_is_ignored() {
        let mut metadata = Map::new();
        metadata.insert("display_name".to_string(), json!(42));
        let user = IdentityUser {
            id: Uuid::new_v4(),
            email: None,
            user_metadata: metadata,
        };

        assert_eq!(user.display_name(), None);
    }
}
