//! User service for authentication and account management
//!
//! Password hashing and verification run on the blocking thread pool;
//! token signing uses the keys precomputed in `JwtService`.

use super::storage::ImageStorage;
use crate::auth::{JwtService, PasswordService};
use crate::config::AdminConfig;
use crate::error::ApiError;
use crate::repositories::{ProgressImageRepository, UpdateUser, UserRecord, UserRepository};
use diet_tracker_shared::types::{
    AuthTokens, LoginResponse, RegisterRequest, UpdateUserRequest, UserProfile,
};
use sqlx::PgPool;
use uuid::Uuid;

const EMAIL_TAKEN: &str = "Email already registered";

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Create a regular user account; callers must already be administrators
    pub async fn register(db: &PgPool, req: &RegisterRequest) -> Result<UserProfile, ApiError> {
        let email = normalize_email(&req.email);

        if UserRepository::email_exists(db, &email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let password_hash = PasswordService::hash_async(req.password.clone())
            .await
            .map_err(ApiError::Internal)?;

        // A concurrent registration can still hit the unique index
        let user = UserRepository::create(db, &email, req.name.trim(), &password_hash, false)
            .await
            .map_err(|e| ApiError::conflict_or_internal(e, EMAIL_TAKEN))?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(to_profile(user))
    }

    /// Login with email and password
    pub async fn login(
        db: &PgPool,
        jwt: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, ApiError> {
        let user = UserRepository::find_by_email(db, &normalize_email(email))
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

        let valid = PasswordService::verify_async(password.to_string(), user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }

        let tokens = issue_tokens(jwt, user.id)?;

        Ok(LoginResponse {
            tokens,
            user: to_profile(user),
        })
    }

    /// Exchange a refresh token for a new token pair
    pub async fn refresh(
        db: &PgPool,
        jwt: &JwtService,
        refresh_token: &str,
    ) -> Result<AuthTokens, ApiError> {
        let claims = jwt
            .validate_refresh_token(refresh_token)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid refresh token: {}", e)))?;

        let user_id = claims
            .user_id()
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

        // The account may have been deleted since the token was issued
        UserRepository::find_by_id(db, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        issue_tokens(jwt, user_id)
    }

    pub async fn profile(db: &PgPool, user_id: Uuid) -> Result<UserProfile, ApiError> {
        let user = Self::find(db, user_id).await?;
        Ok(to_profile(user))
    }

    /// Whether the user holds the administrator flag
    pub async fn is_admin(db: &PgPool, user_id: Uuid) -> Result<bool, ApiError> {
        let user = UserRepository::find_by_id(db, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(user.map(|u| u.is_admin).unwrap_or(false))
    }

    pub async fn update_me(
        db: &PgPool,
        user_id: Uuid,
        req: &UpdateUserRequest,
    ) -> Result<UserProfile, ApiError> {
        let password_hash = match req.password.clone() {
            Some(password) => Some(
                PasswordService::hash_async(password)
                    .await
                    .map_err(ApiError::Internal)?,
            ),
            None => None,
        };

        let changes = UpdateUser {
            email: req.email.as_deref().map(normalize_email),
            name: req.name.as_deref().map(|n| n.trim().to_string()),
            password_hash,
            avatar_url: req.avatar_url.clone(),
        };

        let user = UserRepository::update(db, user_id, &changes)
            .await
            .map_err(|e| ApiError::conflict_or_internal(e, EMAIL_TAKEN))?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(to_profile(user))
    }

    /// Delete the account with everything it owns, then its image files
    pub async fn delete_me(
        db: &PgPool,
        storage: &ImageStorage,
        user_id: Uuid,
    ) -> Result<(), ApiError> {
        let image_urls = ProgressImageRepository::urls_for_user(db, user_id)
            .await
            .map_err(ApiError::Internal)?;

        let deleted = UserRepository::delete(db, user_id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound("User not found".to_string()));
        }

        for url in &image_urls {
            storage.remove(url).await;
        }

        tracing::info!(user_id = %user_id, images = image_urls.len(), "User account deleted");

        Ok(())
    }

    /// Create the configured administrator unless that email is already taken
    ///
    /// Returns whether an account was created.
    pub async fn ensure_admin(db: &PgPool, admin: &AdminConfig) -> anyhow::Result<bool> {
        let email = normalize_email(&admin.email);

        if UserRepository::email_exists(db, &email).await? {
            tracing::debug!(email = %email, "Administrator account already present");
            return Ok(false);
        }

        let password_hash = PasswordService::hash_async(admin.password.clone()).await?;
        let user = UserRepository::create(db, &email, admin.name.trim(), &password_hash, true).await?;

        tracing::info!(user_id = %user.id, email = %email, "Administrator account created");

        Ok(true)
    }

    async fn find(db: &PgPool, user_id: Uuid) -> Result<UserRecord, ApiError> {
        UserRepository::find_by_id(db, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }
}

fn issue_tokens(jwt: &JwtService, user_id: Uuid) -> Result<AuthTokens, ApiError> {
    let access_token = jwt
        .generate_access_token(user_id)
        .map_err(ApiError::Internal)?;
    let refresh_token = jwt
        .generate_refresh_token(user_id)
        .map_err(ApiError::Internal)?;

    Ok(AuthTokens {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: jwt.access_token_expiry_secs(),
    })
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn to_profile(user: UserRecord) -> UserProfile {
    UserProfile {
        id: user.id,
        email: user.email,
        name: user.name,
        is_admin: user.is_admin,
        avatar_url: user.avatar_url,
        created_at: user.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }

    #[test]
    fn test_issued_tokens_validate() {
        let jwt = JwtService::new("test-secret", 3600, 604800);
        let user_id = Uuid::new_v4();

        let tokens = issue_tokens(&jwt, user_id).unwrap();

        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 3600);
        let claims = jwt.validate_access_token(&tokens.access_token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert!(jwt.validate_refresh_token(&tokens.refresh_token).is_ok());
    }
}
