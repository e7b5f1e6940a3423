use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher,
    PasswordVerifier, Version,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::errors::auth::AuthError;
use crate::types::db::user::{self, ActiveModel, Entity as User};
use crate::types::internal::role::Role;

/// CredentialStore manages user accounts and password verification
pub struct CredentialStore {
    db: DatabaseConnection,
    password_pepper: String,
}

impl CredentialStore {
    /// Create a new CredentialStore with the given database connection and password pepper
    ///
    /// # Arguments
    /// * `db` - The database connection
    /// * `password_pepper` - The secret key used for password hashing
    pub fn new(db: DatabaseConnection, password_pepper: String) -> Self {
        Self { db, password_pepper }
    }

    /// Register a new user
    ///
    /// # Arguments
    /// * `email` - The email for the new user, globally unique
    /// * `password` - The plaintext password to hash and store
    /// * `name` - Optional display name
    /// * `role` - Validated role tag
    ///
    /// # Returns
    /// * `Ok(user::Model)` - The created user row
    /// * `Err(AuthError)` - DuplicateEmail if the email is taken, or InternalError
    pub async fn register_user(
        &self,
        email: String,
        password: String,
        name: Option<String>,
        role: &Role,
    ) -> Result<user::Model, AuthError> {
        // Check if email already exists
        let existing_user = User::find()
            .filter(user::Column::Email.eq(&email))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))?;

        if existing_user.is_some() {
            return Err(AuthError::duplicate_email());
        }

        let user_id = Uuid::new_v4().to_string();
        let password_hash = self.hash_password(&password)?;
        let created_at = Utc::now().timestamp();

        let new_user = ActiveModel {
            id: Set(user_id),
            email: Set(email),
            password_hash: Set(password_hash),
            name: Set(name),
            role: Set(role.as_str().to_string()),
            created_at: Set(created_at),
        };

        let inserted = new_user.insert(&self.db).await.map_err(|e| {
            // Check if it's a unique constraint violation
            if e.to_string().contains("UNIQUE") {
                AuthError::duplicate_email()
            } else {
                AuthError::internal_error(format!("Database error: {}", e))
            }
        })?;

        Ok(inserted)
    }

    /// Verify user credentials and return the user row on success
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    ///
    /// # Arguments
    /// * `email` - The email to verify
    /// * `password` - The plaintext password to verify
    ///
    /// # Returns
    /// * `Ok(user::Model)` - The user row if credentials are valid
    /// * `Err(AuthError)` - InvalidCredentials if email not found or password incorrect
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<user::Model, AuthError> {
        let user = User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|_| AuthError::invalid_credentials())?;

        let user = user.ok_or_else(AuthError::invalid_credentials)?;

        let parsed_hash =
            PasswordHash::new(&user.password_hash).map_err(|_| AuthError::invalid_credentials())?;

        self.argon2()
            .map_err(|_| AuthError::invalid_credentials())?
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::invalid_credentials())?;

        Ok(user)
    }

    /// Load a user row by id
    ///
    /// # Returns
    /// * `Ok(Some(user::Model))` - The user row
    /// * `Ok(None)` - No user with this id
    /// * `Err(AuthError)` - Database error
    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<user::Model>, AuthError> {
        User::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))
    }

    fn argon2(&self) -> Result<Argon2<'_>, argon2::Error> {
        // Argon2id with the pepper as secret parameter
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
    }

    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let argon2 = self.argon2().map_err(|e| {
            AuthError::internal_error(format!("Failed to initialize Argon2 with secret: {}", e))
        })?;

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::internal_error(format!("Password hashing error: {}", e)))?
            .to_string();

        Ok(password_hash)
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("db", &"<connection>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}
