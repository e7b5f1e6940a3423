use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::errors::auth::AuthError;
use crate::types::dto::common::ErrorResponse;

/// Error types for the portal resource endpoints (categories, content,
/// processes). Unauthorized means the identity is unknown; Forbidden means
/// the identity is known but the role fails the access check.
#[derive(ApiResponse, Debug)]
pub enum PortalError {
    /// Missing, invalid or expired token
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Requester role fails the access policy
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Requested resource does not exist
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Required field missing or malformed
    #[oai(status = 400)]
    Validation(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl PortalError {
    /// Create an Unauthorized error
    pub fn unauthorized() -> Self {
        PortalError::Unauthorized(Json(ErrorResponse {
            error: "unauthorized".to_string(),
            message: "Authentication required".to_string(),
            status_code: 401,
        }))
    }

    /// Create a Forbidden error
    pub fn forbidden() -> Self {
        PortalError::Forbidden(Json(ErrorResponse {
            error: "forbidden".to_string(),
            message: "Insufficient permissions".to_string(),
            status_code: 403,
        }))
    }

    /// Create a NotFound error
    pub fn not_found(message: impl Into<String>) -> Self {
        PortalError::NotFound(Json(ErrorResponse {
            error: "not_found".to_string(),
            message: message.into(),
            status_code: 404,
        }))
    }

    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortalError::Validation(Json(ErrorResponse {
            error: "validation_error".to_string(),
            message: message.into(),
            status_code: 400,
        }))
    }

    /// Create an InternalError
    pub fn internal_error(message: String) -> Self {
        PortalError::InternalError(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message,
            status_code: 500,
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            PortalError::Unauthorized(json) => json.0.message.clone(),
            PortalError::Forbidden(json) => json.0.message.clone(),
            PortalError::NotFound(json) => json.0.message.clone(),
            PortalError::Validation(json) => json.0.message.clone(),
            PortalError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for PortalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

// Token failures surface as 401 on resource endpoints; anything else from
// the auth layer reaching here is an internal fault.
impl From<AuthError> for PortalError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(_)
            | AuthError::ExpiredToken(_)
            | AuthError::InvalidCredentials(_) => PortalError::unauthorized(),
            AuthError::InternalError(json) => PortalError::internal_error(json.0.message.clone()),
            other => PortalError::internal_error(other.message()),
        }
    }
}
