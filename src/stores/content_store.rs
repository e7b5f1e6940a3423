use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::portal::PortalError;
use crate::types::db::content::{self, ActiveModel, Entity as Content};
use crate::types::internal::content_kind::ContentKind;

/// ContentStore manages learning content items
pub struct ContentStore {
    db: DatabaseConnection,
}

impl ContentStore {
    /// Create a new ContentStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// List content, newest first, optionally filtered by owning category
    /// and/or kind
    pub async fn list(
        &self,
        category_id: Option<&str>,
        kind: Option<&ContentKind>,
    ) -> Result<Vec<content::Model>, PortalError> {
        let mut query = Content::find().order_by_desc(content::Column::CreatedAt);

        if let Some(category_id) = category_id {
            query = query.filter(content::Column::CategoryId.eq(category_id));
        }
        if let Some(kind) = kind {
            query = query.filter(content::Column::Kind.eq(kind.as_str()));
        }

        query
            .all(&self.db)
            .await
            .map_err(|e| PortalError::internal_error(format!("Database error: {}", e)))
    }

    /// Find a content item by id
    pub async fn find_by_id(&self, id: &str) -> Result<Option<content::Model>, PortalError> {
        Content::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::internal_error(format!("Database error: {}", e)))
    }

    /// Load the subset of the given ids that still exist.
    ///
    /// Used to resolve the weak related-content references on process steps:
    /// callers reassemble their own ordering, so the result order here is
    /// unspecified and misses are simply absent.
    pub async fn find_existing(&self, ids: &[String]) -> Result<Vec<content::Model>, PortalError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Content::find()
            .filter(content::Column::Id.is_in(ids.iter().map(String::as_str)))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::internal_error(format!("Database error: {}", e)))
    }

    /// Create a new content item
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        title: String,
        description: String,
        category_id: String,
        kind: &ContentKind,
        duration: Option<String>,
        thumbnail: Option<String>,
        video_url: Option<String>,
        body: Option<String>,
    ) -> Result<content::Model, PortalError> {
        let new_content = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            title: Set(title),
            description: Set(description),
            category_id: Set(category_id),
            kind: Set(kind.as_str().to_string()),
            duration: Set(duration),
            thumbnail: Set(thumbnail),
            video_url: Set(video_url),
            body: Set(body),
            views: Set(0),
            created_at: Set(Utc::now().timestamp()),
        };

        new_content
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::internal_error(format!("Database error: {}", e)))
    }

    /// Apply a partial update to a content item
    #[allow(clippy::too_many_arguments)]
    pub async fn apply_update(
        &self,
        id: &str,
        title: Option<String>,
        description: Option<String>,
        category_id: Option<String>,
        kind: Option<ContentKind>,
        duration: Option<String>,
        thumbnail: Option<String>,
        video_url: Option<String>,
        body: Option<String>,
    ) -> Result<content::Model, PortalError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| PortalError::not_found("Content not found"))?;

        let mut active: ActiveModel = existing.into();
        if let Some(title) = title {
            active.title = Set(title);
        }
        if let Some(description) = description {
            active.description = Set(description);
        }
        if let Some(category_id) = category_id {
            active.category_id = Set(category_id);
        }
        if let Some(kind) = kind {
            active.kind = Set(kind.as_str().to_string());
        }
        if let Some(duration) = duration {
            active.duration = Set(Some(duration));
        }
        if let Some(thumbnail) = thumbnail {
            active.thumbnail = Set(Some(thumbnail));
        }
        if let Some(video_url) = video_url {
            active.video_url = Set(Some(video_url));
        }
        if let Some(body) = body {
            active.body = Set(Some(body));
        }

        active
            .update(&self.db)
            .await
            .map_err(|e| PortalError::internal_error(format!("Database error: {}", e)))
    }

    /// Bump the view counter by one and return the updated row
    pub async fn increment_views(&self, id: &str) -> Result<content::Model, PortalError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| PortalError::not_found("Content not found"))?;

        let views = existing.views + 1;
        let mut active: ActiveModel = existing.into();
        active.views = Set(views);

        active
            .update(&self.db)
            .await
            .map_err(|e| PortalError::internal_error(format!("Database error: {}", e)))
    }

    /// Delete a content item
    pub async fn delete(&self, id: &str) -> Result<(), PortalError> {
        let result = Content::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::internal_error(format!("Database error: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(PortalError::not_found("Content not found"));
        }

        Ok(())
    }
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("db", &"<connection>")
            .finish()
    }
}
