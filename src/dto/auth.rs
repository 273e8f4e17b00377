use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body for `POST user/login/`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct Credentials {
    /// Account username.
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: String,
    /// Account password.
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

/// Body for `POST user/signup/`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct SignupRequest {
    /// Desired username.
    #[validate(length(min = 3, max = 32))]
    pub username: String,
    /// Contact email address.
    #[validate(email)]
    pub email: String,
    /// Account password.
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
}

/// Identity fields returned by login, signup, and profile calls.
///
/// The backend has shipped both `id` and `_id` spellings across revisions;
/// both deserialize into the single canonical `id` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    /// Canonical user identifier.
    #[serde(alias = "_id")]
    pub id: String,
    /// Display username.
    pub username: String,
    /// Contact email address.
    #[serde(default)]
    pub email: String,
}

/// Response of `GET user/isauthenticated/`.
#[derive(Debug, Deserialize)]
pub struct AuthCheckResponse {
    /// Whether the cookie session is currently valid.
    #[serde(default)]
    pub authenticated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_accepts_both_id_spellings() {
        let canonical: UserProfile =
            serde_json::from_str(r#"{"id":"u-1","username":"alice","email":"a@b.c"}"#).unwrap();
        let legacy: UserProfile =
            serde_json::from_str(r#"{"_id":"u-1","username":"alice","email":"a@b.c"}"#).unwrap();
        assert_eq!(canonical, legacy);
        assert_eq!(canonical.id, "u-1");
    }

    #[test]
    fn auth_check_defaults_to_false() {
        let response: AuthCheckResponse = serde_json::from_str("{}").unwrap();
        assert!(!response.authenticated);
    }

    #[test]
    fn signup_request_is_validated() {
        let bad = SignupRequest {
            username: "ab".into(),
            email: "not-an-email".into(),
            password: "short".into(),
        };
        assert!(bad.validate().is_err());

        let good = SignupRequest {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "correct horse".into(),
        };
        assert!(good.validate().is_ok());
    }
}
