use std::env;

/// Application settings loaded once at startup from the environment
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub database_url: String,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub password_pepper: String,

    /// Optional initial admin account, seeded on startup when both
    /// SEED_ADMIN_EMAIL and SEED_ADMIN_PASSWORD are set
    pub seed_admin: Option<SeedAdmin>,
}

#[derive(Debug, Clone)]
pub struct SeedAdmin {
    pub email: String,
    pub password: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Required environment variable {0} is not set")]
    MissingVariable(&'static str),
}

impl AppSettings {
    /// Load settings from environment variables.
    ///
    /// DATABASE_URL and BIND_ADDR have development defaults; the two secrets
    /// (JWT_SECRET, PASSWORD_PEPPER) are required.
    pub fn from_env() -> Result<Self, SettingsError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://skillbase.db?mode=rwc".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| SettingsError::MissingVariable("JWT_SECRET"))?;

        let password_pepper = env::var("PASSWORD_PEPPER")
            .map_err(|_| SettingsError::MissingVariable("PASSWORD_PEPPER"))?;

        let seed_admin = match (env::var("SEED_ADMIN_EMAIL"), env::var("SEED_ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(SeedAdmin { email, password })
            }
            _ => None,
        };

        Ok(Self {
            database_url,
            bind_addr,
            jwt_secret,
            password_pepper,
            seed_admin,
        })
    }
}
