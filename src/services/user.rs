//! User service implementation
//!
//! This service is the entry point bot handlers use: it registers users on
//! first contact, validates language preferences and walks users through the
//! terms-of-service flow.

use tracing::{debug, info, warn};

use crate::config::I18nConfig;
use crate::database::repositories::UserRepository;
use crate::models::user::{TermsStatus, UserRecord};
use crate::utils::errors::{Result, UserStoreError};

/// User service for managing user operations
#[derive(Debug, Clone)]
pub struct UserService {
    user_repository: UserRepository,
    i18n: I18nConfig,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(user_repository: UserRepository, i18n: I18nConfig) -> Self {
        Self {
            user_repository,
            i18n,
        }
    }

    /// Register a new user or get existing user
    ///
    /// When a concurrent caller inserts the same user between the lookup and
    /// the insert, the row it created is returned.
    pub async fn get_or_create_user(&self, external_user_id: i64) -> Result<UserRecord> {
        debug!(external_user_id = external_user_id, "Attempting to register or get user");

        if let Some(existing_user) = self.user_repository.find_by_external_id(external_user_id).await? {
            return Ok(existing_user);
        }

        match self.user_repository.create(external_user_id).await {
            Ok(user) => {
                info!(user_id = user.id, external_user_id = external_user_id, "New user registered successfully");
                Ok(user)
            }
            Err(UserStoreError::AlreadyExists { .. }) => {
                debug!(external_user_id = external_user_id, "User created concurrently, fetching it");
                self.user_repository
                    .find_by_external_id(external_user_id)
                    .await?
                    .ok_or(UserStoreError::UserNotFound { external_user_id })
            }
            Err(e) => Err(e),
        }
    }

    /// Get user by external ID
    pub async fn get_user(&self, external_user_id: i64) -> Result<Option<UserRecord>> {
        self.user_repository.find_by_external_id(external_user_id).await
    }

    /// Set user language preference
    pub async fn set_language(&self, external_user_id: i64, language_code: &str) -> Result<()> {
        debug!(external_user_id = external_user_id, language_code = %language_code, "Setting user language preference");

        if !self.is_supported_language(language_code) {
            warn!(external_user_id = external_user_id, language_code = %language_code, "Unsupported language code");
            return Err(UserStoreError::InvalidInput(format!(
                "Unsupported language: {}",
                language_code
            )));
        }

        self.user_repository
            .update_language(external_user_id, language_code)
            .await?;
        info!(external_user_id = external_user_id, language_code = %language_code, "User language preference updated");

        Ok(())
    }

    pub fn is_supported_language(&self, language_code: &str) -> bool {
        self.i18n
            .supported_languages
            .iter()
            .any(|supported| supported == language_code)
    }

    /// Record that the user has been shown the rules
    pub async fn mark_rules_read(&self, external_user_id: i64) -> Result<()> {
        self.set_terms_status(external_user_id, TermsStatus::ReadRules).await
    }

    /// Record that the user accepted the terms
    pub async fn accept_terms(&self, external_user_id: i64) -> Result<()> {
        self.set_terms_status(external_user_id, TermsStatus::Accepted).await
    }

    /// Send the user back to the start of the terms flow
    pub async fn reset_terms(&self, external_user_id: i64) -> Result<()> {
        self.set_terms_status(external_user_id, TermsStatus::Initial).await
    }

    async fn set_terms_status(&self, external_user_id: i64, status: TermsStatus) -> Result<()> {
        self.user_repository
            .update_terms_status(external_user_id, status)
            .await?;
        info!(external_user_id = external_user_id, terms_status = %status, "Terms status updated");

        Ok(())
    }

    /// Whether the user has accepted the terms; unknown users have not
    pub async fn has_accepted_terms(&self, external_user_id: i64) -> Result<bool> {
        let user = self.user_repository.find_by_external_id(external_user_id).await?;
        Ok(user.is_some_and(|user| user.has_accepted_terms()))
    }

    /// Remember the last message the bot sent, so it can be edited or removed later
    pub async fn record_bot_message(&self, external_user_id: i64, message_id: i32) -> Result<()> {
        self.user_repository
            .update_last_bot_message_id(external_user_id, message_id)
            .await?;
        debug!(external_user_id = external_user_id, message_id = message_id, "Last bot message recorded");

        Ok(())
    }
}
