//! Category domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::MAX_CATEGORY_NAME_LENGTH;
use crate::error::{DomainError, DomainResult};

/// Drink/menu category with soft delete support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Soft delete flag (true = hidden from every query)
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn rename(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    pub fn describe(&mut self, description: Option<String>) {
        self.description = description;
        self.updated_at = Utc::now();
    }

    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
        self.updated_at = Utc::now();
    }
}

/// Trim a category name and enforce its length rules.
pub fn normalize_name(name: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid("Category name is required"));
    }
    if trimmed.chars().count() > MAX_CATEGORY_NAME_LENGTH {
        return Err(DomainError::invalid(format!(
            "Category name must be at most {} characters",
            MAX_CATEGORY_NAME_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

/// Category creation input
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

impl NewCategory {
    /// Build the entity for a validated creation request.
    pub fn into_category(self) -> DomainResult<Category> {
        let name = normalize_name(&self.name)?;
        let now = Utc::now();
        Ok(Category {
            id: Uuid::new_v4(),
            name,
            description: self.description,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Category update input
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Filter for category listing; shared by the count and the page query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryQuery {
    /// Case-insensitive substring match on the name
    pub search: Option<String>,
}

impl CategoryQuery {
    pub fn search(term: Option<String>) -> Self {
        Self {
            search: term
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        }
    }
}

/// Category response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}
