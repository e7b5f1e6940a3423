use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::auth::BearerAuth;
use crate::errors::portal::PortalError;
use crate::services::{access_filter, TokenService};
use crate::stores::CategoryStore;
use crate::types::db::category;
use crate::types::dto::category::{
    CategoryListResponse, CategoryResponse, CategorySummary, CreateCategoryRequest,
    UpdateCategoryRequest,
};
use crate::types::dto::common::DeleteResponse;

/// Category API endpoints
pub struct CategoriesApi {
    category_store: Arc<CategoryStore>,
    token_service: Arc<TokenService>,
}

impl CategoriesApi {
    /// Create a new CategoriesApi with the given CategoryStore and TokenService
    pub fn new(category_store: Arc<CategoryStore>, token_service: Arc<TokenService>) -> Self {
        Self {
            category_store,
            token_service,
        }
    }
}

/// API tags for category endpoints
#[derive(Tags)]
enum CategoryTags {
    /// Category management endpoints
    Categories,
}

#[OpenApi]
impl CategoriesApi {
    /// List categories visible to the requester, name ascending
    #[oai(path = "/categories", method = "get", tag = "CategoryTags::Categories")]
    pub async fn list(&self, auth: BearerAuth) -> Result<Json<CategoryListResponse>, PortalError> {
        let requester = super::authenticate(&self.token_service, &auth)?;

        let categories = self
            .category_store
            .list_with_counts()
            .await?
            .into_iter()
            .filter(|(cat, _)| access_filter::is_visible(&cat.allowed_roles, &requester.role))
            .map(|(cat, count)| summary(cat, count))
            .collect();

        Ok(Json(CategoryListResponse { categories }))
    }

    /// Create a new category (admin only)
    #[oai(path = "/categories", method = "post", tag = "CategoryTags::Categories")]
    pub async fn create(
        &self,
        auth: BearerAuth,
        body: Json<CreateCategoryRequest>,
    ) -> Result<Json<CategoryResponse>, PortalError> {
        let requester = super::authenticate(&self.token_service, &auth)?;
        if !requester.role.is_admin() {
            return Err(PortalError::forbidden());
        }

        if body.name.trim().is_empty() || body.slug.trim().is_empty() {
            return Err(PortalError::validation("Name and slug are required"));
        }

        let created = self
            .category_store
            .create(
                body.name.clone(),
                body.slug.clone(),
                body.description.clone().unwrap_or_default(),
                body.icon.clone().unwrap_or_else(|| "folder".to_string()),
                body.allowed_roles.clone().unwrap_or_default(),
            )
            .await?;

        Ok(Json(CategoryResponse {
            category: summary(created, 0),
        }))
    }

    /// Update a category identified by slug (admin only)
    #[oai(path = "/categories/:slug", method = "patch", tag = "CategoryTags::Categories")]
    pub async fn update(
        &self,
        auth: BearerAuth,
        slug: Path<String>,
        body: Json<UpdateCategoryRequest>,
    ) -> Result<Json<CategoryResponse>, PortalError> {
        let requester = super::authenticate(&self.token_service, &auth)?;
        if !requester.role.is_admin() {
            return Err(PortalError::forbidden());
        }

        let updated = self
            .category_store
            .update(
                &slug.0,
                body.name.clone(),
                body.description.clone(),
                body.icon.clone(),
                body.allowed_roles.clone(),
            )
            .await?;

        let count = self.category_store.content_count(&updated.id).await?;

        Ok(Json(CategoryResponse {
            category: summary(updated, count),
        }))
    }

    /// Delete a category and all of its content (admin only)
    #[oai(path = "/categories/:slug", method = "delete", tag = "CategoryTags::Categories")]
    pub async fn delete(
        &self,
        auth: BearerAuth,
        slug: Path<String>,
    ) -> Result<Json<DeleteResponse>, PortalError> {
        let requester = super::authenticate(&self.token_service, &auth)?;
        if !requester.role.is_admin() {
            return Err(PortalError::forbidden());
        }

        let (name, removed) = self.category_store.delete_cascade(&slug.0).await?;

        Ok(Json(DeleteResponse {
            success: true,
            message: format!(
                "Category \"{}\" and {} content items deleted",
                name, removed
            ),
        }))
    }
}

fn summary(category: category::Model, content_count: u64) -> CategorySummary {
    CategorySummary {
        id: category.id,
        slug: category.slug,
        name: category.name,
        description: category.description,
        icon: category.icon,
        allowed_roles: category.allowed_roles,
        content_count,
    }
}
