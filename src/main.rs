use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;
use sea_orm::{Database, DatabaseConnection};
use tracing::{error, info};

use skillbase_backend::api::{AuthApi, CategoriesApi, ContentApi, HealthApi, ProcessesApi};
use skillbase_backend::config::{init_logging, AppSettings};
use skillbase_backend::errors::AuthError;
use skillbase_backend::services::{ProcessResolver, TokenService};
use skillbase_backend::stores::{CategoryStore, ContentStore, CredentialStore, ProcessStore};
use skillbase_backend::types::internal::Role;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    let settings = AppSettings::from_env().expect("Failed to load application settings");

    // Connect to database
    let db: DatabaseConnection = Database::connect(&settings.database_url)
        .await
        .expect("Failed to connect to database");

    info!("Connected to database: {}", settings.database_url);

    // Run migrations
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    info!("Database migrations completed");

    let token_service = Arc::new(TokenService::new(settings.jwt_secret.clone()));
    let credential_store = Arc::new(CredentialStore::new(
        db.clone(),
        settings.password_pepper.clone(),
    ));
    let category_store = Arc::new(CategoryStore::new(db.clone()));
    let content_store = Arc::new(ContentStore::new(db.clone()));
    let process_store = Arc::new(ProcessStore::new(db.clone()));
    let resolver = Arc::new(ProcessResolver::new(
        process_store.clone(),
        content_store.clone(),
    ));

    // Seed the initial admin account when configured
    if let Some(seed) = &settings.seed_admin {
        match credential_store
            .register_user(
                seed.email.clone(),
                seed.password.clone(),
                Some("Administrator".to_string()),
                &Role::Admin,
            )
            .await
        {
            Ok(user) => info!("Seeded admin account {}", user.email),
            Err(AuthError::DuplicateEmail(_)) => {
                info!("Admin account already exists, skipping seed")
            }
            Err(e) => error!("Failed to seed admin account: {}", e),
        }
    }

    let auth_api = AuthApi::new(credential_store.clone(), token_service.clone());
    let categories_api = CategoriesApi::new(category_store.clone(), token_service.clone());
    let content_api = ContentApi::new(
        content_store.clone(),
        category_store.clone(),
        token_service.clone(),
    );
    let processes_api = ProcessesApi::new(
        process_store.clone(),
        resolver.clone(),
        token_service.clone(),
    );

    // Create OpenAPI service with API implementations
    let api_service = OpenApiService::new(
        (HealthApi, auth_api, categories_api, content_api, processes_api),
        "Skillbase API",
        "1.0.0",
    )
    .server(format!("http://{}/api", settings.bind_addr));

    // Generate Swagger UI from OpenAPI service
    let ui = api_service.swagger_ui();

    // Compose routes: nest API service under /api and Swagger UI under /swagger
    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    info!("Starting server on http://{}", settings.bind_addr);
    info!("Swagger UI available at http://{}/swagger", settings.bind_addr);

    Server::new(TcpListener::bind(settings.bind_addr.clone()))
        .run(app)
        .await
}
