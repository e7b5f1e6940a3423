use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi, Tags,
};
use std::sync::Arc;

use crate::api::auth::BearerAuth;
use crate::errors::portal::PortalError;
use crate::services::TokenService;
use crate::stores::{CategoryStore, ContentStore};
use crate::types::db::content;
use crate::types::dto::common::DeleteResponse;
use crate::types::dto::content::{
    ContentItem, ContentListResponse, ContentResponse, CreateContentRequest, UpdateContentRequest,
};
use crate::types::internal::content_kind::ContentKind;

/// Content API endpoints
pub struct ContentApi {
    content_store: Arc<ContentStore>,
    category_store: Arc<CategoryStore>,
    token_service: Arc<TokenService>,
}

impl ContentApi {
    /// Create a new ContentApi with the given stores and TokenService
    pub fn new(
        content_store: Arc<ContentStore>,
        category_store: Arc<CategoryStore>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            content_store,
            category_store,
            token_service,
        }
    }
}

/// API tags for content endpoints
#[derive(Tags)]
enum ContentTags {
    /// Learning content endpoints
    Content,
}

#[OpenApi]
impl ContentApi {
    /// List content, newest first, optionally filtered by category slug
    /// and/or kind
    #[oai(path = "/content", method = "get", tag = "ContentTags::Content")]
    pub async fn list(
        &self,
        auth: BearerAuth,
        category: Query<Option<String>>,
        kind: Query<Option<String>>,
    ) -> Result<Json<ContentListResponse>, PortalError> {
        super::authenticate(&self.token_service, &auth)?;

        // The category filter arrives as a slug; resolve it to the owning id
        let category_id = match category.0.as_deref() {
            Some(slug) => {
                let category = self
                    .category_store
                    .find_by_slug(slug)
                    .await?
                    .ok_or_else(|| PortalError::not_found("Category not found"))?;
                Some(category.id)
            }
            None => None,
        };

        let kind = match kind.0.as_deref() {
            Some(raw) => Some(parse_kind(raw)?),
            None => None,
        };

        let items = self
            .content_store
            .list(category_id.as_deref(), kind.as_ref())
            .await?
            .into_iter()
            .map(item)
            .collect();

        Ok(Json(ContentListResponse { content: items }))
    }

    /// Fetch a single content item by id
    #[oai(path = "/content/:id", method = "get", tag = "ContentTags::Content")]
    pub async fn get(
        &self,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<ContentResponse>, PortalError> {
        super::authenticate(&self.token_service, &auth)?;

        let found = self
            .content_store
            .find_by_id(&id.0)
            .await?
            .ok_or_else(|| PortalError::not_found("Content not found"))?;

        Ok(Json(ContentResponse { content: item(found) }))
    }

    /// Create a new content item (admin only)
    #[oai(path = "/content", method = "post", tag = "ContentTags::Content")]
    pub async fn create(
        &self,
        auth: BearerAuth,
        body: Json<CreateContentRequest>,
    ) -> Result<Json<ContentResponse>, PortalError> {
        let requester = super::authenticate(&self.token_service, &auth)?;
        if !requester.role.is_admin() {
            return Err(PortalError::forbidden());
        }

        if body.title.trim().is_empty() {
            return Err(PortalError::validation("Title is required"));
        }
        let kind = parse_kind(&body.kind)?;

        // The owning category must exist; content is never orphaned
        self.category_store
            .find_by_id(&body.category_id)
            .await?
            .ok_or_else(|| PortalError::not_found("Category not found"))?;

        let created = self
            .content_store
            .create(
                body.title.clone(),
                body.description.clone().unwrap_or_default(),
                body.category_id.clone(),
                &kind,
                body.duration.clone(),
                body.thumbnail.clone(),
                body.video_url.clone(),
                body.body.clone(),
            )
            .await?;

        Ok(Json(ContentResponse { content: item(created) }))
    }

    /// Update a content item.
    ///
    /// `{"action": "increment_views"}` bumps the view counter and is open to
    /// any authenticated user; every other change is admin only.
    #[oai(path = "/content/:id", method = "patch", tag = "ContentTags::Content")]
    pub async fn update(
        &self,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<UpdateContentRequest>,
    ) -> Result<Json<ContentResponse>, PortalError> {
        let requester = super::authenticate(&self.token_service, &auth)?;

        if body.action.as_deref() == Some("increment_views") {
            let updated = self.content_store.increment_views(&id.0).await?;
            return Ok(Json(ContentResponse { content: item(updated) }));
        }

        if !requester.role.is_admin() {
            return Err(PortalError::forbidden());
        }

        let kind = match body.kind.as_deref() {
            Some(raw) => Some(parse_kind(raw)?),
            None => None,
        };

        if let Some(category_id) = body.category_id.as_deref() {
            self.category_store
                .find_by_id(category_id)
                .await?
                .ok_or_else(|| PortalError::not_found("Category not found"))?;
        }

        let updated = self
            .content_store
            .apply_update(
                &id.0,
                body.title.clone(),
                body.description.clone(),
                body.category_id.clone(),
                kind,
                body.duration.clone(),
                body.thumbnail.clone(),
                body.video_url.clone(),
                body.body.clone(),
            )
            .await?;

        Ok(Json(ContentResponse { content: item(updated) }))
    }

    /// Delete a content item (admin only)
    #[oai(path = "/content/:id", method = "delete", tag = "ContentTags::Content")]
    pub async fn delete(
        &self,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<DeleteResponse>, PortalError> {
        let requester = super::authenticate(&self.token_service, &auth)?;
        if !requester.role.is_admin() {
            return Err(PortalError::forbidden());
        }

        self.content_store.delete(&id.0).await?;

        Ok(Json(DeleteResponse {
            success: true,
            message: "Content deleted".to_string(),
        }))
    }
}

fn parse_kind(raw: &str) -> Result<ContentKind, PortalError> {
    ContentKind::parse(raw)
        .ok_or_else(|| PortalError::validation("Kind must be one of: video, article, instruction"))
}

fn item(content: content::Model) -> ContentItem {
    ContentItem {
        id: content.id,
        title: content.title,
        description: content.description,
        category_id: content.category_id,
        kind: content.kind,
        duration: content.duration,
        thumbnail: content.thumbnail,
        video_url: content.video_url,
        body: content.body,
        views: content.views,
        created_at: content.created_at,
    }
}
