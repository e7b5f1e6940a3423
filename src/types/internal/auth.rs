use serde::{Deserialize, Serialize};

use crate::types::internal::role::Role;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user_id)
    pub sub: String,

    /// Email of the authenticated user
    pub email: String,

    /// Role tag, authoritative for access decisions until the token expires
    pub role: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Identity of the requester, passed explicitly into every access-checked
/// call. Built from verified token claims; never ambient state.
#[derive(Debug, Clone)]
pub struct RequesterIdentity {
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

impl From<&Claims> for RequesterIdentity {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub.clone(),
            email: claims.email.clone(),
            role: Role::parse(&claims.role),
        }
    }
}
