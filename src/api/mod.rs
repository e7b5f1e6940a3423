// API layer - HTTP endpoints
pub mod auth;
pub mod categories;
pub mod content;
pub mod health;
pub mod processes;

pub use auth::{AuthApi, BearerAuth};
pub use categories::CategoriesApi;
pub use content::ContentApi;
pub use health::HealthApi;
pub use processes::ProcessesApi;

use crate::errors::auth::AuthError;
use crate::services::TokenService;
use crate::types::internal::auth::RequesterIdentity;

/// Verify the bearer token and build the requester identity from its claims.
/// The role claim is trusted verbatim until the token expires.
pub(crate) fn authenticate(
    token_service: &TokenService,
    auth: &BearerAuth,
) -> Result<RequesterIdentity, AuthError> {
    let claims = token_service.verify_token(&auth.0.token)?;
    Ok(RequesterIdentity::from(&claims))
}
