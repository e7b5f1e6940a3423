use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Request model for user registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Email address, globally unique
    pub email: String,

    /// Plaintext password, hashed before storage
    pub password: String,

    /// Optional display name
    pub name: Option<String>,

    /// Role tag; defaults to "user" when omitted
    pub role: Option<String>,
}

/// Request model for user login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address for authentication
    pub email: String,

    /// Password for authentication
    pub password: String,
}

/// Public view of a user account
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID (UUID)
    pub id: String,

    /// Email address
    pub email: String,

    /// Display name, if set
    pub name: Option<String>,

    /// Role tag
    pub role: String,

    /// Account creation time (Unix timestamp)
    pub created_at: i64,
}

/// Response model carrying a token and the authenticated user
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Signed JWT carrying {userId, email, role}
    pub token: String,

    /// The authenticated user
    pub user: UserResponse,
}
