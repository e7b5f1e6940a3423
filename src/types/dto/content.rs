use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// A unit of learning material
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ContentItem {
    /// Content ID (UUID)
    pub id: String,

    /// Title
    pub title: String,

    /// Description text
    pub description: String,

    /// Owning category ID
    pub category_id: String,

    /// One of: video, article, instruction
    pub kind: String,

    /// Display duration, e.g. "12:30"
    pub duration: Option<String>,

    /// Thumbnail URL
    pub thumbnail: Option<String>,

    /// Video URL, for video content
    pub video_url: Option<String>,

    /// Article/instruction body text
    pub body: Option<String>,

    /// View counter
    pub views: i64,

    /// Creation time (Unix timestamp)
    pub created_at: i64,
}

/// Response model for content listing
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ContentListResponse {
    /// Content items, newest first
    pub content: Vec<ContentItem>,
}

/// Response model wrapping a single content item
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ContentResponse {
    /// The content item
    pub content: ContentItem,
}

/// Request model for content creation
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateContentRequest {
    /// Title (required)
    pub title: String,

    /// Description text; defaults to empty
    pub description: Option<String>,

    /// Owning category ID (required, must exist)
    pub category_id: String,

    /// One of: video, article, instruction (required)
    pub kind: String,

    /// Display duration
    pub duration: Option<String>,

    /// Thumbnail URL
    pub thumbnail: Option<String>,

    /// Video URL
    pub video_url: Option<String>,

    /// Article/instruction body text
    pub body: Option<String>,
}

/// Request model for content update
///
/// With `action: "increment_views"` the view counter is bumped and every
/// other field is ignored; otherwise the set fields are applied as a partial
/// update (admin only).
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateContentRequest {
    /// Special action; only "increment_views" is recognized
    pub action: Option<String>,

    /// New title
    pub title: Option<String>,

    /// New description text
    pub description: Option<String>,

    /// New owning category ID (must exist)
    pub category_id: Option<String>,

    /// New kind; one of: video, article, instruction
    pub kind: Option<String>,

    /// New display duration
    pub duration: Option<String>,

    /// New thumbnail URL
    pub thumbnail: Option<String>,

    /// New video URL
    pub video_url: Option<String>,

    /// New body text
    pub body: Option<String>,
}
