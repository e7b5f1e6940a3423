// Internal types - not exposed over the API surface
pub mod auth;
pub mod content_kind;
pub mod role;

pub use auth::{Claims, RequesterIdentity};
pub use content_kind::ContentKind;
pub use role::Role;
