// Services layer - Business logic and orchestration
pub mod access_filter;
pub mod process_resolver;
pub mod token_service;

pub use access_filter::{is_visible, AccessPolicy};
pub use process_resolver::ProcessResolver;
pub use token_service::TokenService;
