//! Token pair response value object for API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::token::TokenPair;

/// Serialized form of a [`TokenPair`] handed to the presentation layer
///
/// Timestamps are ISO-8601 with an explicit offset, e.g. `2024-01-01T12:00:00+00:00`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenPairResponse {
    /// Always "Bearer"
    pub token_type: String,

    /// Signed access token
    pub access_token: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    /// Cleartext refresh token
    pub refresh_token: String,

    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,

    /// Roles granted at issuance
    pub scope: Vec<String>,

    #[serde(with = "atom_format")]
    pub issued_at: DateTime<Utc>,

    #[serde(with = "atom_format")]
    pub expires_at: DateTime<Utc>,

    #[serde(with = "atom_format")]
    pub refresh_expires_at: DateTime<Utc>,
}

impl TokenPairResponse {
    pub fn from_token_pair(pair: &TokenPair) -> Self {
        Self {
            token_type: pair.token_type().to_string(),
            access_token: pair.access_token().to_string(),
            expires_in: pair.expires_in(),
            refresh_token: pair.refresh_token().to_string(),
            refresh_expires_in: pair.refresh_expires_in(),
            scope: pair.scopes().to_vec(),
            issued_at: pair.issued_at(),
            expires_at: pair.access_token_expires_at(),
            refresh_expires_at: pair.refresh_token_expires_at(),
        }
    }
}

impl From<&TokenPair> for TokenPairResponse {
    fn from(pair: &TokenPair) -> Self {
        Self::from_token_pair(pair)
    }
}

impl TokenPair {
    /// Serializable view of this pair
    pub fn to_response(&self) -> TokenPairResponse {
        TokenPairResponse::from_token_pair(self)
    }
}

mod atom_format {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, false))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample_pair() -> TokenPair {
        let issued_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        TokenPair::new(
            "access-token".to_string(),
            "refresh-token".to_string(),
            issued_at,
            issued_at + Duration::seconds(900),
            issued_at + Duration::seconds(604800),
            vec!["ROLE_USER".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn test_response_field_names_and_formats() {
        let json = serde_json::to_value(sample_pair().to_response()).unwrap();

        assert_eq!(json["token_type"], "Bearer");
        assert_eq!(json["access_token"], "access-token");
        assert_eq!(json["expires_in"], 900);
        assert_eq!(json["refresh_token"], "refresh-token");
        assert_eq!(json["refresh_expires_in"], 604800);
        assert_eq!(json["scope"], serde_json::json!(["ROLE_USER"]));
        assert_eq!(json["issued_at"], "2024-01-01T12:00:00+00:00");
        assert_eq!(json["expires_at"], "2024-01-01T12:15:00+00:00");
        assert_eq!(json["refresh_expires_at"], "2024-01-08T12:00:00+00:00");
        assert_eq!(json.as_object().unwrap().len(), 9);
    }

    #[test]
    fn test_response_parses_back() {
        let response = TokenPairResponse::from(&sample_pair());
        let raw = serde_json::to_string(&response).unwrap();
        let parsed: TokenPairResponse = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, response);
    }
}
