// Stores layer - Data access and repository pattern
pub mod category_store;
pub mod content_store;
pub mod credential_store;
pub mod process_store;

pub use category_store::CategoryStore;
pub use content_store::ContentStore;
pub use credential_store::CredentialStore;
pub use process_store::{NewStep, ProcessRecord, ProcessStore, StepRecord};
