//! Authentication service - account provisioning, login and token checks.
//!
//! Password hashing lives in the domain `Password` value object; this service
//! only orchestrates it through the Unit of Work.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{Account, NewAccount, Password};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub nickname: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Provision a new account
    async fn register(
        &self,
        nickname: String,
        email: String,
        password: String,
    ) -> AppResult<Account>;

    /// Login by nickname or email and return a JWT
    async fn login(&self, login: String, password: String) -> AppResult<TokenResponse>;

    /// Issue a JWT for an already-resolved account
    fn issue_token(&self, account: &Account) -> AppResult<TokenResponse>;

    /// Verify JWT and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn generate_token(account: &Account, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: account.id,
        nickname: account.nickname.clone(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(
        &self,
        nickname: String,
        email: String,
        password: String,
    ) -> AppResult<Account> {
        let password_hash = Password::new(&password)?.into_string();

        // A racing insert that slips past these checks is reported as `Taken`
        // by the unique indexes.
        let account = with_transaction!(self.uow, |ctx| {
            let accounts = ctx.accounts();
            if accounts.find_by_nickname(&nickname).await?.is_some() {
                return Err(AppError::Taken("Nickname"));
            }
            if accounts.find_by_email(&email).await?.is_some() {
                return Err(AppError::Taken("Email"));
            }

            accounts
                .create(NewAccount {
                    nickname,
                    email,
                    password_hash,
                })
                .await
        })?;

        tracing::info!(account_id = %account.id, nickname = %account.nickname, "Account created");
        Ok(account)
    }

    async fn login(&self, login: String, password: String) -> AppResult<TokenResponse> {
        let accounts = self.uow.accounts();
        let account = match accounts.find_by_email(&login).await? {
            Some(account) => Some(account),
            None => accounts.find_by_nickname(&login).await?,
        };

        // Verify against a dummy hash when the account is unknown so both
        // paths cost the same.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let password_hash = account
            .as_ref()
            .map(|a| a.password_hash.as_str())
            .unwrap_or(dummy_hash);
        let password_valid = Password::from_hash(password_hash.to_string()).verify(&password);

        match account {
            Some(account) if password_valid => generate_token(&account, &self.config),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    fn issue_token(&self, account: &Account) -> AppResult<TokenResponse> {
        generate_token(account, &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}
