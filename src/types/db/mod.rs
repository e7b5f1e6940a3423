// Database entities (sea-orm)
pub mod business_process;
pub mod category;
pub mod content;
pub mod process_step;
pub mod user;
