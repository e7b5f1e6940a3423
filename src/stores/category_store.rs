use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::errors::portal::PortalError;
use crate::types::db::category::{self, ActiveModel, Entity as Category};
use crate::types::db::content::{self, Entity as Content};

/// CategoryStore manages learning content categories
pub struct CategoryStore {
    db: DatabaseConnection,
}

impl CategoryStore {
    /// Create a new CategoryStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// List all categories, name ascending, each with its content count.
    /// Access filtering happens above this layer; the store returns every row.
    pub async fn list_with_counts(&self) -> Result<Vec<(category::Model, u64)>, PortalError> {
        let categories = Category::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::internal_error(format!("Database error: {}", e)))?;

        let mut result = Vec::with_capacity(categories.len());
        for cat in categories {
            let count = self.content_count(&cat.id).await?;
            result.push((cat, count));
        }

        Ok(result)
    }

    /// Find a category by its slug
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<category::Model>, PortalError> {
        Category::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::internal_error(format!("Database error: {}", e)))
    }

    /// Find a category by its id
    pub async fn find_by_id(&self, id: &str) -> Result<Option<category::Model>, PortalError> {
        Category::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::internal_error(format!("Database error: {}", e)))
    }

    /// Number of content items owned by a category
    pub async fn content_count(&self, category_id: &str) -> Result<u64, PortalError> {
        Content::find()
            .filter(content::Column::CategoryId.eq(category_id))
            .count(&self.db)
            .await
            .map_err(|e| PortalError::internal_error(format!("Database error: {}", e)))
    }

    /// Create a new category
    ///
    /// # Returns
    /// * `Ok(category::Model)` - The created row
    /// * `Err(PortalError)` - Validation if the slug is already in use
    pub async fn create(
        &self,
        name: String,
        slug: String,
        description: String,
        icon: String,
        allowed_roles: String,
    ) -> Result<category::Model, PortalError> {
        let existing = self.find_by_slug(&slug).await?;
        if existing.is_some() {
            return Err(PortalError::validation("Slug is already in use"));
        }

        let new_category = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            slug: Set(slug),
            name: Set(name),
            description: Set(description),
            icon: Set(icon),
            allowed_roles: Set(allowed_roles),
        };

        new_category.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                PortalError::validation("Slug is already in use")
            } else {
                PortalError::internal_error(format!("Database error: {}", e))
            }
        })
    }

    /// Apply a partial update to a category identified by slug.
    /// Empty name/icon values are ignored; description and allowed_roles may
    /// be set to empty explicitly.
    pub async fn update(
        &self,
        slug: &str,
        name: Option<String>,
        description: Option<String>,
        icon: Option<String>,
        allowed_roles: Option<String>,
    ) -> Result<category::Model, PortalError> {
        let existing = self
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| PortalError::not_found("Category not found"))?;

        let mut active: ActiveModel = existing.into();
        if let Some(name) = name.filter(|v| !v.is_empty()) {
            active.name = Set(name);
        }
        if let Some(description) = description {
            active.description = Set(description);
        }
        if let Some(icon) = icon.filter(|v| !v.is_empty()) {
            active.icon = Set(icon);
        }
        if let Some(allowed_roles) = allowed_roles {
            active.allowed_roles = Set(allowed_roles);
        }

        active
            .update(&self.db)
            .await
            .map_err(|e| PortalError::internal_error(format!("Database error: {}", e)))
    }

    /// Delete a category and all of its content (cascade, irreversible)
    ///
    /// # Returns
    /// * `Ok((name, content_count))` - The deleted category's name and the
    ///   exact number of content rows removed with it
    /// * `Err(PortalError)` - NotFound if the slug is unknown
    pub async fn delete_cascade(&self, slug: &str) -> Result<(String, u64), PortalError> {
        let category = self
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| PortalError::not_found("Category not found"))?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::internal_error(format!("Failed to start transaction: {}", e)))?;

        // Delete owned content explicitly so the count reported back is exact
        let deleted_content = Content::delete_many()
            .filter(content::Column::CategoryId.eq(&category.id))
            .exec(&txn)
            .await
            .map_err(|e| PortalError::internal_error(format!("Failed to delete content: {}", e)))?;

        Category::delete_by_id(category.id.as_str())
            .exec(&txn)
            .await
            .map_err(|e| PortalError::internal_error(format!("Failed to delete category: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| PortalError::internal_error(format!("Failed to commit transaction: {}", e)))?;

        Ok((category.name, deleted_content.rows_affected))
    }
}

impl std::fmt::Debug for CategoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryStore")
            .field("db", &"<connection>")
            .finish()
    }
}
