//! User model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

use crate::utils::errors::{Result, UserStoreError};

/// Language assigned to newly created users
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

/// Width of the `language_code` column
pub const MAX_LANGUAGE_CODE_LEN: usize = 10;

/// One stored user, keyed by the messaging platform's user id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub external_user_id: i64,
    pub language_code: String,
    pub terms_status: TermsStatus,
    pub accepted_at: Option<DateTime<Utc>>,
    pub last_bot_message_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn has_accepted_terms(&self) -> bool {
        self.terms_status == TermsStatus::Accepted
    }
}

/// Progress of a user through reading and accepting the usage terms
///
/// Maps onto the `terms_status` Postgres enum type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "terms_status", rename_all = "snake_case")]
pub enum TermsStatus {
    #[default]
    Initial,
    ReadRules,
    Accepted,
}

impl TermsStatus {
    pub const ALL: [TermsStatus; 3] = [
        TermsStatus::Initial,
        TermsStatus::ReadRules,
        TermsStatus::Accepted,
    ];

    /// Value stored in the `terms_status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            TermsStatus::Initial => "initial",
            TermsStatus::ReadRules => "read_rules",
            TermsStatus::Accepted => "accepted",
        }
    }
}

impl fmt::Display for TermsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown terms status: {0:?}")]
pub struct ParseTermsStatusError(pub String);

impl FromStr for TermsStatus {
    type Err = ParseTermsStatusError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "initial" => Ok(TermsStatus::Initial),
            "read_rules" => Ok(TermsStatus::ReadRules),
            "accepted" => Ok(TermsStatus::Accepted),
            other => Err(ParseTermsStatusError(other.to_string())),
        }
    }
}

/// Check that `code` fits the `language_code` column.
pub fn validate_language_code(code: &str) -> Result<()> {
    if code.trim().is_empty() {
        return Err(UserStoreError::InvalidInput(
            "Language code cannot be empty".to_string(),
        ));
    }

    if code.chars().count() > MAX_LANGUAGE_CODE_LEN {
        return Err(UserStoreError::InvalidInput(format!(
            "Language code {:?} is longer than {} characters",
            code, MAX_LANGUAGE_CODE_LEN
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_terms_status_default_is_initial() {
        assert_eq!(TermsStatus::default(), TermsStatus::Initial);
    }

    #[test]
    fn test_terms_status_serializes_as_column_value() {
        let json = serde_json::to_string(&TermsStatus::ReadRules).unwrap();
        assert_eq!(json, "\"read_rules\"");

        let parsed: TermsStatus = serde_json::from_str("\"accepted\"").unwrap();
        assert_eq!(parsed, TermsStatus::Accepted);
    }

    #[test]
    fn test_unknown_terms_status_rejected() {
        let error = "agreed".parse::<TermsStatus>().unwrap_err();
        assert_eq!(error, ParseTermsStatusError("agreed".to_string()));
        assert!("Accepted".parse::<TermsStatus>().is_err());
    }

    #[test]
    fn test_has_accepted_terms() {
        let now = Utc::now();
        let mut record = UserRecord {
            id: 1,
            external_user_id: 42,
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
            terms_status: TermsStatus::Initial,
            accepted_at: None,
            last_bot_message_id: None,
            created_at: now,
            updated_at: now,
        };
        assert!(!record.has_accepted_terms());

        record.terms_status = TermsStatus::Accepted;
        record.accepted_at = Some(now);
        assert!(record.has_accepted_terms());
    }

    #[test]
    fn test_language_code_limits() {
        assert!(validate_language_code("en").is_ok());
        assert!(validate_language_code("pt-BR").is_ok());
        assert!(validate_language_code("").is_err());
        assert!(validate_language_code("  ").is_err());
        assert!(validate_language_code("zh-Hant-TW1").is_err());
    }

    proptest! {
        #[test]
        fn terms_status_text_is_stable(index in 0usize..3) {
            let status = TermsStatus::ALL[index];
            prop_assert_eq!(status.as_str().parse::<TermsStatus>(), Ok(status));
            prop_assert_eq!(status.to_string(), status.as_str());
        }

        #[test]
        fn short_language_codes_accepted(code in "[a-z]{2}(-[A-Z]{2})?") {
            prop_assert!(validate_language_code(&code).is_ok());
        }
    }
}
