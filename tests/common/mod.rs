// Common test utilities for integration tests

use migration::{Migrator, MigratorTrait};
use poem_openapi::auth::Bearer;
use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;

use skillbase_backend::api::{AuthApi, BearerAuth, CategoriesApi, ContentApi, ProcessesApi};
use skillbase_backend::services::{ProcessResolver, TokenService};
use skillbase_backend::stores::{CategoryStore, ContentStore, CredentialStore, ProcessStore};
use skillbase_backend::types::internal::Role;

/// Creates a test database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// The full API surface wired over one test database
pub struct TestPortal {
    pub auth_api: AuthApi,
    pub categories_api: CategoriesApi,
    pub content_api: ContentApi,
    pub processes_api: ProcessesApi,
    pub credential_store: Arc<CredentialStore>,
    pub token_service: Arc<TokenService>,
}

/// Wires stores, services and API structs the way main() does
pub async fn setup_portal() -> TestPortal {
    let db = setup_test_db().await;

    let token_service = Arc::new(TokenService::new(
        "test-secret-key-minimum-32-characters-long".to_string(),
    ));
    let credential_store = Arc::new(CredentialStore::new(
        db.clone(),
        "test-pepper-for-integration-tests".to_string(),
    ));
    let category_store = Arc::new(CategoryStore::new(db.clone()));
    let content_store = Arc::new(ContentStore::new(db.clone()));
    let process_store = Arc::new(ProcessStore::new(db.clone()));
    let resolver = Arc::new(ProcessResolver::new(
        process_store.clone(),
        content_store.clone(),
    ));

    TestPortal {
        auth_api: AuthApi::new(credential_store.clone(), token_service.clone()),
        categories_api: CategoriesApi::new(category_store.clone(), token_service.clone()),
        content_api: ContentApi::new(content_store, category_store, token_service.clone()),
        processes_api: ProcessesApi::new(process_store, resolver, token_service.clone()),
        credential_store,
        token_service,
    }
}

/// Registers a user with the given role and returns a bearer for them
pub async fn bearer_for(portal: &TestPortal, email: &str, role: Role) -> BearerAuth {
    let user = portal
        .credential_store
        .register_user(email.to_string(), "password123".to_string(), None, &role)
        .await
        .expect("Failed to register user");

    let token = portal
        .token_service
        .issue_token(&user)
        .expect("Failed to issue token");

    BearerAuth(Bearer { token })
}

/// BearerAuth is consumed by handlers; clone it for repeated calls
pub fn clone_auth(auth: &BearerAuth) -> BearerAuth {
    BearerAuth(Bearer {
        token: auth.0.token.clone(),
    })
}
