//! Authentication and guide account management

use std::sync::Arc;

use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{
        ChangePasswordRequest, CreateGuide, GuideSummary, NewUser, Role, UpdateGuide, User,
        UserClaims,
    },
    services::identity::{hash_password, verify_password, IdentityProvider},
};

#[derive(Clone)]
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(identity: Arc<dyn IdentityProvider>, config: AuthConfig) -> Self {
        Self { identity, config }
    }

    /// Check credentials and issue a JWT for the account
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let invalid = || AppError::Authentication("Invalid credentials.".to_string());

        let user = self
            .identity
            .find_by_email(email.trim())
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&user.password_hash, password)? {
            tracing::warn!(user_id = user.id, "Login refused: wrong password");
            return Err(invalid());
        }

        let token = self.create_token_for_user(&user)?;
        tracing::info!(user_id = user.id, role = %user.role, "User logged in");
        Ok((token, user))
    }

    /// Create JWT token for a user
    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        UserClaims::for_user(user, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    pub async fn current_user(&self, user_id: i32) -> AppResult<User> {
        self.identity
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", user_id)))
    }

    /// Change a password knowing the current one; no session needed
    pub async fn change_password(&self, request: &ChangePasswordRequest) -> AppResult<()> {
        request.validate()?;

        let user = self
            .identity
            .find_by_email(request.email.trim())
            .await?
            .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

        if !verify_password(&user.password_hash, &request.current_password)? {
            return Err(AppError::Authentication(
                "Current password is incorrect.".to_string(),
            ));
        }

        let hash = hash_password(&request.new_password)?;
        self.identity.set_password_hash(user.id, hash).await?;
        tracing::info!(user_id = user.id, "Password changed");
        Ok(())
    }

    /// Create the seed administrator unless an account with that email exists.
    /// Returns whether an account was created.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> AppResult<bool> {
        if self.identity.find_by_email(email).await?.is_some() {
            return Ok(false);
        }

        let admin = self
            .identity
            .create(NewUser {
                email: email.trim().to_string(),
                user_name: Some("Administrator".to_string()),
                password_hash: hash_password(password)?,
                role: Role::Admin,
            })
            .await?;

        tracing::info!(user_id = admin.id, "Seed administrator created");
        Ok(true)
    }

    pub async fn list_guides(&self) -> AppResult<Vec<GuideSummary>> {
        let guides = self.identity.list_by_role(Role::Guide).await?;
        Ok(guides.into_iter().map(GuideSummary::from).collect())
    }

    pub async fn create_guide(&self, data: CreateGuide) -> AppResult<GuideSummary> {
        data.validate()?;
        let email = data.email.trim().to_string();

        if self.identity.email_exists(&email, None).await? {
            return Err(AppError::Conflict("Email already in use".to_string()));
        }

        let guide = self
            .identity
            .create(NewUser {
                email,
                user_name: non_blank(data.user_name),
                password_hash: hash_password(&data.password)?,
                role: Role::Guide,
            })
            .await?;

        tracing::info!(user_id = guide.id, "Guide account created");
        Ok(guide.into())
    }

    pub async fn update_guide(&self, id: i32, data: UpdateGuide) -> AppResult<GuideSummary> {
        data.validate()?;
        self.get_guide(id).await?;

        let email = non_blank(data.email);
        if let Some(email) = &email {
            if self.identity.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict("Email already in use".to_string()));
            }
        }

        if let Some(password) = data.password.as_deref() {
            self.identity
                .set_password_hash(id, hash_password(password)?)
                .await?;
        }

        let guide = self
            .identity
            .update(id, email, non_blank(data.user_name))
            .await?;

        tracing::info!(user_id = id, "Guide account updated");
        Ok(guide.into())
    }

    pub async fn delete_guide(&self, id: i32) -> AppResult<()> {
        self.get_guide(id).await?;
        self.identity.delete(id).await?;
        tracing::info!(user_id = id, "Guide account deleted");
        Ok(())
    }

    /// Guide account by id; administrators are not reachable through here
    async fn get_guide(&self, id: i32) -> AppResult<User> {
        self.identity
            .find_by_id(id)
            .await?
            .filter(|user| user.role == Role::Guide)
            .ok_or_else(|| AppError::NotFound(format!("Guide with id {} not found", id)))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
