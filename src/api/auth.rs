use poem_openapi::{auth::Bearer, payload::Json, OpenApi, SecurityScheme, Tags};
use std::sync::Arc;

use crate::errors::auth::AuthError;
use crate::errors::portal::PortalError;
use crate::services::TokenService;
use crate::stores::CredentialStore;
use crate::types::db::user;
use crate::types::dto::auth::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::types::internal::role::Role;

/// Authentication API endpoints
pub struct AuthApi {
    credential_store: Arc<CredentialStore>,
    token_service: Arc<TokenService>,
}

impl AuthApi {
    /// Create a new AuthApi with the given CredentialStore and TokenService
    pub fn new(credential_store: Arc<CredentialStore>, token_service: Arc<TokenService>) -> Self {
        Self {
            credential_store,
            token_service,
        }
    }
}

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(pub Bearer);

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Register a new user and receive an authentication token
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    pub async fn register(&self, body: Json<RegisterRequest>) -> Result<Json<AuthResponse>, AuthError> {
        if body.email.trim().is_empty() || body.password.is_empty() {
            return Err(AuthError::validation("Email and password are required"));
        }

        // Role is validated into the closed tag set; omitted means "user"
        let role = Role::parse(body.role.as_deref().unwrap_or(""));

        let user = self
            .credential_store
            .register_user(
                body.email.trim().to_string(),
                body.password.clone(),
                body.name.clone().filter(|n| !n.is_empty()),
                &role,
            )
            .await?;

        let token = self.token_service.issue_token(&user)?;

        Ok(Json(AuthResponse {
            token,
            user: user_response(user),
        }))
    }

    /// Login with email and password to receive an authentication token
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    pub async fn login(&self, body: Json<LoginRequest>) -> Result<Json<AuthResponse>, AuthError> {
        if body.email.is_empty() || body.password.is_empty() {
            return Err(AuthError::validation("Email and password are required"));
        }

        let user = self
            .credential_store
            .verify_credentials(&body.email, &body.password)
            .await?;

        let token = self.token_service.issue_token(&user)?;

        Ok(Json(AuthResponse {
            token,
            user: user_response(user),
        }))
    }

    /// Return the current user row for a verified token
    #[oai(path = "/me", method = "get", tag = "AuthTags::Authentication")]
    pub async fn me(&self, auth: BearerAuth) -> Result<Json<UserResponse>, PortalError> {
        let requester = super::authenticate(&self.token_service, &auth)?;

        // The token is self-contained, but /me reflects the live row
        let user = self
            .credential_store
            .find_by_id(&requester.user_id)
            .await
            .map_err(PortalError::from)?
            .ok_or_else(|| PortalError::not_found("User not found"))?;

        Ok(Json(user_response(user)))
    }
}

fn user_response(user: user::Model) -> UserResponse {
    UserResponse {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
        created_at: user.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};

    async fn setup_test_db() -> (DatabaseConnection, Arc<CredentialStore>, Arc<TokenService>) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let credential_store = Arc::new(CredentialStore::new(
            db.clone(),
            "test-pepper-for-api-tests".to_string(),
        ));
        let token_service = Arc::new(TokenService::new(
            "test-secret-key-minimum-32-characters-long".to_string(),
        ));

        (db, credential_store, token_service)
    }

    fn register_request(email: &str, role: Option<&str>) -> Json<RegisterRequest> {
        Json(RegisterRequest {
            email: email.to_string(),
            password: "testpass".to_string(),
            name: Some("Test User".to_string()),
            role: role.map(|r| r.to_string()),
        })
    }

    #[tokio::test]
    async fn test_register_returns_token_and_user() {
        let (_db, credential_store, token_service) = setup_test_db().await;
        let api = AuthApi::new(credential_store, token_service.clone());

        let result = api.register(register_request("new@example.com", None)).await;

        assert!(result.is_ok());
        let response = result.unwrap();
        assert!(!response.token.is_empty());
        assert_eq!(response.user.email, "new@example.com");
        assert_eq!(response.user.role, "user");

        // Token decodes back to the same identity
        let claims = token_service.verify_token(&response.token).unwrap();
        assert_eq!(claims.sub, response.user.id);
        assert_eq!(claims.role, "user");
    }

    #[tokio::test]
    async fn test_register_accepts_role_tag() {
        let (_db, credential_store, token_service) = setup_test_db().await;
        let api = AuthApi::new(credential_store, token_service);

        let result = api
            .register(register_request("mgr@example.com", Some("manager")))
            .await;

        assert!(result.is_ok());
        assert_eq!(result.unwrap().user.role, "manager");
    }

    #[tokio::test]
    async fn test_register_rejects_missing_fields() {
        let (_db, credential_store, token_service) = setup_test_db().await;
        let api = AuthApi::new(credential_store, token_service);

        let result = api
            .register(Json(RegisterRequest {
                email: "   ".to_string(),
                password: "pass".to_string(),
                name: None,
                role: None,
            }))
            .await;

        assert!(result.is_err());
        match result {
            Err(AuthError::Validation(_)) => {
                // Expected error type
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let (_db, credential_store, token_service) = setup_test_db().await;
        let api = AuthApi::new(credential_store, token_service);

        api.register(register_request("dup@example.com", None))
            .await
            .expect("First registration failed");

        let result = api.register(register_request("dup@example.com", None)).await;

        assert!(result.is_err());
        match result {
            Err(AuthError::DuplicateEmail(_)) => {
                // Expected error type
            }
            _ => panic!("Expected DuplicateEmail error"),
        }
    }

    #[tokio::test]
    async fn test_login_with_valid_credentials() {
        let (_db, credential_store, token_service) = setup_test_db().await;
        let api = AuthApi::new(credential_store, token_service);

        api.register(register_request("login@example.com", None))
            .await
            .expect("Registration failed");

        let result = api
            .login(Json(LoginRequest {
                email: "login@example.com".to_string(),
                password: "testpass".to_string(),
            }))
            .await;

        assert!(result.is_ok());
        let response = result.unwrap();
        assert!(!response.token.is_empty());
        assert_eq!(response.user.email, "login@example.com");
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let (_db, credential_store, token_service) = setup_test_db().await;
        let api = AuthApi::new(credential_store, token_service);

        api.register(register_request("login@example.com", None))
            .await
            .expect("Registration failed");

        let result = api
            .login(Json(LoginRequest {
                email: "login@example.com".to_string(),
                password: "wrongpass".to_string(),
            }))
            .await;

        assert!(result.is_err());
        match result {
            Err(AuthError::InvalidCredentials(_)) => {
                // Expected error type
            }
            _ => panic!("Expected InvalidCredentials error"),
        }
    }

    #[tokio::test]
    async fn test_login_with_unknown_email_is_indistinguishable() {
        let (_db, credential_store, token_service) = setup_test_db().await;
        let api = AuthApi::new(credential_store, token_service);

        let result = api
            .login(Json(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "whatever".to_string(),
            }))
            .await;

        assert!(result.is_err());
        match result {
            Err(AuthError::InvalidCredentials(_)) => {
                // Expected error type
            }
            _ => panic!("Expected InvalidCredentials error"),
        }
    }

    #[tokio::test]
    async fn test_me_returns_current_user() {
        let (_db, credential_store, token_service) = setup_test_db().await;
        let api = AuthApi::new(credential_store, token_service);

        let registered = api
            .register(register_request("me@example.com", Some("buyer")))
            .await
            .expect("Registration failed");

        let auth = BearerAuth(Bearer {
            token: registered.token.clone(),
        });
        let result = api.me(auth).await;

        assert!(result.is_ok());
        let me = result.unwrap();
        assert_eq!(me.id, registered.user.id);
        assert_eq!(me.role, "buyer");
    }

    #[tokio::test]
    async fn test_me_with_invalid_token_is_unauthorized() {
        let (_db, credential_store, token_service) = setup_test_db().await;
        let api = AuthApi::new(credential_store, token_service);

        let auth = BearerAuth(Bearer {
            token: "invalid-jwt-token".to_string(),
        });
        let result = api.me(auth).await;

        assert!(result.is_err());
        match result {
            Err(PortalError::Unauthorized(_)) => {
                // Expected error type
            }
            _ => panic!("Expected Unauthorized error"),
        }
    }
}
