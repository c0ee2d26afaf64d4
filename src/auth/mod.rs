use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tokens are valid for a fixed 24 hours after issuance
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Claims written into every issued token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(subject: impl Into<String>) -> Self {
        Self::issued_at(subject, Utc::now())
    }

    pub fn issued_at(subject: impl Into<String>, now: DateTime<Utc>) -> Self {
        let exp = (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp();

        Self {
            sub: subject.into(),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_one_day_after_issue() {
        let now = Utc::now();
        let claims = Claims::issued_at("admin@example.com", now);

        assert_eq!(claims.sub, "admin@example.com");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }
}
