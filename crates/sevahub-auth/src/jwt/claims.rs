//! JWT claims payload.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in an access token.
///
/// Different issuers put the subject identity under different claim names;
/// [`Claims::subject`] accepts the conventional ones in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Standard subject claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Non-standard `user_id` claim used by some issuers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    /// Non-standard `uid` claim used by some issuers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<Uuid>,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    /// Resolve the subject user identity from whichever claim carries it.
    ///
    /// Tries `sub` (parsed as a UUID), then `user_id`, then `uid`. A verified
    /// token whose payload yields `None` here is unusable for registration.
    pub fn subject(&self) -> Option<Uuid> {
        self.sub
            .as_deref()
            .and_then(|s| Uuid::parse_str(s).ok())
            .or(self.user_id)
            .or(self.uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_prefers_sub() {
        let id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let claims = Claims {
            sub: Some(id.to_string()),
            user_id: Some(other),
            uid: None,
            exp: 0,
            iat: None,
        };
        assert_eq!(claims.subject(), Some(id));
    }

    #[test]
    fn test_subject_falls_back_to_user_id() {
        let id = Uuid::new_v4();
        let claims = Claims {
            sub: Some("service-account".to_string()),
            user_id: Some(id),
            uid: None,
            exp: 0,
            iat: None,
        };
        assert_eq!(claims.subject(), Some(id));
    }

    #[test]
    fn test_subject_none_when_unusable() {
        let claims = Claims {
            sub: Some("not-a-uuid".to_string()),
            user_id: None,
            uid: None,
            exp: 0,
            iat: None,
        };
        assert_eq!(claims.subject(), None);
    }
}
