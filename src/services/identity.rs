//! Identity provider seam and password hashing

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;

use crate::{
    error::{AppError, AppResult},
    models::user::{NewUser, Role, User},
    repository::users::UsersRepository,
};

/// Account store consumed by the auth service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    async fn list_by_role(&self, role: Role) -> AppResult<Vec<User>>;

    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool>;

    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Update email and user name; `None` leaves a field unchanged
    async fn update(&self, id: i32, email: Option<String>, user_name: Option<String>) -> AppResult<User>;

    async fn set_password_hash(&self, id: i32, password_hash: String) -> AppResult<()>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Postgres-backed identity provider
#[derive(Clone)]
pub struct PgIdentityProvider {
    users: UsersRepository,
}

impl PgIdentityProvider {
    pub fn new(users: UsersRepository) -> Self {
        Self { users }
    }
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.users.get_by_email(email).await
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        self.users.get_by_id(id).await
    }

    async fn list_by_role(&self, role: Role) -> AppResult<Vec<User>> {
        self.users.list_by_role(role).await
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        self.users.email_exists(email, exclude_id).await
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        self.users.create(&user).await
    }

    async fn update(&self, id: i32, email: Option<String>, user_name: Option<String>) -> AppResult<User> {
        self.users
            .update_profile(id, email.as_deref(), user_name.as_deref())
            .await
    }

    async fn set_password_hash(&self, id: i32, password_hash: String) -> AppResult<()> {
        self.users.set_password_hash(id, &password_hash).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.users.delete(id).await
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string
pub fn verify_password(password_hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
