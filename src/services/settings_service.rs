//! Settings service - profile, password and tag preference workflows.
//!
//! Every submission is validated first. A rejected form never opens a
//! transaction; an accepted one is committed through the Unit of Work.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    normalize_tag_title, validate_password, validate_profile, Account, Password, PasswordForm,
    ProfileForm, Submission, Tag, BLANK_TAG_TITLE,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Data behind the tag settings page
#[derive(Debug, Clone)]
pub struct TagSettings {
    pub account: Account,
    /// Titles associated with the account, sorted
    pub tags: Vec<String>,
    /// Every known tag title, sorted
    pub whitelist: Vec<String>,
}

/// Settings service trait for dependency injection.
///
/// The caller's account id is always passed in explicitly.
#[async_trait]
pub trait SettingsService: Send + Sync {
    /// Load the account whose settings are being edited
    async fn account(&self, account_id: Uuid) -> AppResult<Account>;

    /// Validate and store profile fields
    async fn update_profile(
        &self,
        account_id: Uuid,
        form: ProfileForm,
    ) -> AppResult<Submission<Account>>;

    /// Validate the password pair and store the new hash
    async fn update_password(
        &self,
        account_id: Uuid,
        form: PasswordForm,
    ) -> AppResult<Submission<()>>;

    /// Account tags together with the whitelist of known titles
    async fn tag_settings(&self, account_id: Uuid) -> AppResult<TagSettings>;

    /// Associate a tag by title, creating the tag if it is new
    async fn add_tag(&self, account_id: Uuid, title: &str) -> AppResult<Tag>;

    /// Dissociate a tag by title; unknown titles are ignored
    async fn remove_tag(&self, account_id: Uuid, title: &str) -> AppResult<()>;
}

/// Concrete implementation of SettingsService using Unit of Work.
pub struct SettingsManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> SettingsManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

fn tag_title(raw: &str) -> AppResult<String> {
    normalize_tag_title(raw).ok_or_else(|| AppError::invalid_field("tagTitle", BLANK_TAG_TITLE))
}

#[async_trait]
impl<U: UnitOfWork> SettingsService for SettingsManager<U> {
    async fn account(&self, account_id: Uuid) -> AppResult<Account> {
        self.uow.accounts().find_by_id(account_id).await?.ok_or_account_not_found()
    }

    async fn update_profile(
        &self,
        account_id: Uuid,
        form: ProfileForm,
    ) -> AppResult<Submission<Account>> {
        if let Err(errors) = validate_profile(&form) {
            tracing::debug!(account_id = %account_id, ?errors, "Profile form rejected");
            return Ok(Submission::Rejected(errors));
        }

        let profile = form.into_profile();
        let account = with_transaction!(self.uow, |ctx| {
            ctx.accounts().update_profile(account_id, profile).await
        })?;

        tracing::info!(account_id = %account_id, "Profile updated");
        Ok(Submission::Applied(account))
    }

    async fn update_password(
        &self,
        account_id: Uuid,
        form: PasswordForm,
    ) -> AppResult<Submission<()>> {
        if let Err(errors) = validate_password(&form) {
            tracing::debug!(account_id = %account_id, ?errors, "Password form rejected");
            return Ok(Submission::Rejected(errors));
        }

        let password_hash = Password::new(&form.new_password)?.into_string();
        with_transaction!(self.uow, |ctx| {
            ctx.accounts().update_password(account_id, password_hash).await
        })?;

        tracing::info!(account_id = %account_id, "Password updated");
        Ok(Submission::Applied(()))
    }

    async fn tag_settings(&self, account_id: Uuid) -> AppResult<TagSettings> {
        let account = self.account(account_id).await?;
        let tags = self
            .uow
            .accounts()
            .tags(account_id)
            .await?
            .into_iter()
            .map(|tag| tag.title)
            .collect();
        let whitelist = self.uow.tags().list_titles().await?;

        Ok(TagSettings {
            account,
            tags,
            whitelist,
        })
    }

    async fn add_tag(&self, account_id: Uuid, title: &str) -> AppResult<Tag> {
        let title = tag_title(title)?;

        let (tag, added) = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    ctx.accounts()
                        .find_by_id(account_id)
                        .await?
                        .ok_or_account_not_found()?;
                    let tag = ctx.tags().find_or_create(&title).await?;
                    let added = ctx.accounts().add_tag(account_id, tag.id).await?;
                    Ok::<_, AppError>((tag, added))
                })
            })
            .await?;

        if added {
            tracing::info!(account_id = %account_id, tag = %tag.title, "Tag added");
        } else {
            tracing::debug!(account_id = %account_id, tag = %tag.title, "Tag already present");
        }
        Ok(tag)
    }

    async fn remove_tag(&self, account_id: Uuid, title: &str) -> AppResult<()> {
        let title = tag_title(title)?;

        let removed = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    ctx.accounts()
                        .find_by_id(account_id)
                        .await?
                        .ok_or_account_not_found()?;
                    match ctx.tags().find_by_title(&title).await? {
                        Some(tag) => ctx.accounts().remove_tag(account_id, tag.id).await,
                        None => Ok(false),
                    }
                })
            })
            .await?;

        if removed {
            tracing::info!(account_id = %account_id, "Tag removed");
        } else {
            tracing::debug!(account_id = %account_id, "Tag was not associated");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        AccountRepository, MockAccountRepository, MockTagRepository, TagRepository,
        TransactionContext,
    };
    use chrono::Utc;
    use std::future::Future;
    use std::pin::Pin;

    /// Hands out mocks; transactions are unavailable so only paths that must
    /// not write can succeed.
    struct TestUnitOfWork {
        accounts: Arc<MockAccountRepository>,
        tags: Arc<MockTagRepository>,
    }

    #[async_trait]
    impl UnitOfWork for TestUnitOfWork {
        fn accounts(&self) -> Arc<dyn AccountRepository> {
            self.accounts.clone()
        }

        fn tags(&self) -> Arc<dyn TagRepository> {
            self.tags.clone()
        }

        async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(
                    TransactionContext<'a>,
                ) -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>
                + Send,
            T: Send,
        {
            Err(AppError::internal("transaction opened"))
        }
    }

    fn manager(
        accounts: MockAccountRepository,
        tags: MockTagRepository,
    ) -> SettingsManager<TestUnitOfWork> {
        SettingsManager::new(Arc::new(TestUnitOfWork {
            accounts: Arc::new(accounts),
            tags: Arc::new(tags),
        }))
    }

    fn sample_account(id: Uuid) -> Account {
        let now = Utc::now();
        Account {
            id,
            nickname: "gicheol".to_string(),
            email: "gicheol@example.com".to_string(),
            password_hash: "hash".to_string(),
            bio: Some("hello".to_string()),
            url: None,
            occupation: None,
            location: None,
            profile_image: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn tag(title: &str) -> Tag {
        Tag {
            id: Uuid::new_v4(),
            title: title.to_string(),
        }
    }

    #[tokio::test]
    async fn test_account_not_found() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_by_id().returning(|_| Ok(None));

        let result = manager(accounts, MockTagRepository::new())
            .account(Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(AppError::AccountNotFound)));
    }

    #[tokio::test]
    async fn test_rejected_profile_writes_nothing() {
        let form = ProfileForm {
            bio: Some("a".repeat(36)),
            ..Default::default()
        };
        // The test unit of work fails any transaction, so success here means none was opened
        let result = manager(MockAccountRepository::new(), MockTagRepository::new())
            .update_profile(Uuid::new_v4(), form)
            .await
            .unwrap();

        match result {
            Submission::Rejected(errors) => assert!(errors.fields.contains_key("bio")),
            Submission::Applied(_) => panic!("over-long bio must be rejected"),
        }
    }

    #[tokio::test]
    async fn test_accepted_profile_goes_through_transaction() {
        let form = ProfileForm {
            bio: Some("짧은 소개".to_string()),
            ..Default::default()
        };
        let result = manager(MockAccountRepository::new(), MockTagRepository::new())
            .update_profile(Uuid::new_v4(), form)
            .await;

        // The test unit of work refuses transactions
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_password_mismatch_is_rejected() {
        let form = PasswordForm {
            new_password: "12345678".to_string(),
            new_password_confirm: "11111111".to_string(),
        };
        let result = manager(MockAccountRepository::new(), MockTagRepository::new())
            .update_password(Uuid::new_v4(), form)
            .await
            .unwrap();

        match result {
            Submission::Rejected(errors) => {
                assert_eq!(errors.global.len(), 1);
                assert!(errors.fields.is_empty());
            }
            Submission::Applied(_) => panic!("mismatched passwords must be rejected"),
        }
    }

    #[tokio::test]
    async fn test_short_password_is_rejected() {
        let form = PasswordForm {
            new_password: "1234".to_string(),
            new_password_confirm: "1234".to_string(),
        };
        let result = manager(MockAccountRepository::new(), MockTagRepository::new())
            .update_password(Uuid::new_v4(), form)
            .await
            .unwrap();

        match result {
            Submission::Rejected(errors) => {
                assert!(errors.fields.contains_key("newPassword"));
                assert!(errors.global.is_empty());
            }
            Submission::Applied(_) => panic!("a 4 character password must be rejected"),
        }
    }

    #[tokio::test]
    async fn test_tag_settings_lists_tags_and_whitelist() {
        let id = Uuid::new_v4();
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_account(id))));
        accounts
            .expect_tags()
            .returning(|_| Ok(vec![tag("rust"), tag("spring")]));

        let mut tags = MockTagRepository::new();
        tags.expect_list_titles().returning(|| {
            Ok(vec![
                "jpa".to_string(),
                "rust".to_string(),
                "spring".to_string(),
            ])
        });

        let settings = manager(accounts, tags).tag_settings(id).await.unwrap();

        assert_eq!(settings.account.id, id);
        assert_eq!(settings.tags, vec!["rust", "spring"]);
        assert_eq!(settings.whitelist, vec!["jpa", "rust", "spring"]);
    }

    #[tokio::test]
    async fn test_blank_tag_title_is_invalid_field() {
        let service = manager(MockAccountRepository::new(), MockTagRepository::new());

        let added = service.add_tag(Uuid::new_v4(), "   ").await;
        let removed = service.remove_tag(Uuid::new_v4(), "").await;

        assert!(matches!(added, Err(AppError::InvalidField { .. })));
        assert!(matches!(removed, Err(AppError::InvalidField { .. })));
    }
}
