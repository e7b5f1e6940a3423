use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// A category together with its content count
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Category ID (UUID)
    pub id: String,

    /// URL-safe unique identifier
    pub slug: String,

    /// Display name
    pub name: String,

    /// Description text
    pub description: String,

    /// Icon identifier
    pub icon: String,

    /// Comma-separated access policy; empty or "all" means unrestricted
    pub allowed_roles: String,

    /// Number of content items owned by the category
    pub content_count: u64,
}

/// Response model for category listing
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CategoryListResponse {
    /// Categories visible to the requester, name ascending
    pub categories: Vec<CategorySummary>,
}

/// Response model wrapping a single category
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CategoryResponse {
    /// The category
    pub category: CategorySummary,
}

/// Request model for category creation
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    /// Display name (required)
    pub name: String,

    /// URL-safe unique identifier (required)
    pub slug: String,

    /// Description text; defaults to empty
    pub description: Option<String>,

    /// Icon identifier; defaults to "folder"
    pub icon: Option<String>,

    /// Comma-separated access policy; defaults to unrestricted
    pub allowed_roles: Option<String>,
}

/// Request model for partial category update
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    /// New display name
    pub name: Option<String>,

    /// New description text
    pub description: Option<String>,

    /// New icon identifier
    pub icon: Option<String>,

    /// New comma-separated access policy
    pub allowed_roles: Option<String>,
}
