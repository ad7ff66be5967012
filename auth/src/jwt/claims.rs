use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Session claims carried by every access token.
///
/// Fixed shape: the token payload is exactly `{"email", "userId", "exp"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject email address
    pub email: String,

    /// Subject numeric identifier
    #[serde(rename = "userId")]
    pub user_id: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, expiring `validity` after `issued_at`.
    ///
    /// # Arguments
    /// * `email` - Subject email address
    /// * `user_id` - Subject numeric identifier
    /// * `issued_at` - Issuance instant
    /// * `validity` - How long the token stays valid
    pub fn new(
        email: impl Into<String>,
        user_id: i64,
        issued_at: DateTime<Utc>,
        validity: Duration,
    ) -> Self {
        Self {
            email: email.into(),
            user_id,
            exp: (issued_at + validity).timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_new_sets_expiry_from_issuance() {
        let issued_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let claims = Claims::new("a@b.c", 1, issued_at, Duration::hours(24));
        assert_eq!(claims.exp, issued_at.timestamp() + 86_400);
    }

    #[test]
    fn test_serialized_field_names() {
        let claims = Claims {
            email: "a@b.c".to_string(),
            user_id: 42,
            exp: 1000,
        };

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "email": "a@b.c", "userId": 42, "exp": 1000 })
        );
    }
}
