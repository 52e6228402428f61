use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("Category not found")]
    NotFound,
}

/// A named group of items, ordered by `position` in the UI.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub icon: Option<String>,
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub icon: Option<String>,
}

impl Category {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, CategoryError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, icon, position, created_at, updated_at
             FROM categories
             ORDER BY position, created_at",
        )
        .fetch_all(pool)
        .await?;
        Ok(categories)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Self, CategoryError> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name, icon, position, created_at, updated_at FROM categories WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(CategoryError::NotFound)
    }

    /// New categories append to the end of the ordering.
    pub async fn create(pool: &SqlitePool, data: &CreateCategory) -> Result<Self, CategoryError> {
        let id = Uuid::new_v4();
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, name, icon, position)
             VALUES (?, ?, ?, (SELECT COALESCE(MAX(position), -1) + 1 FROM categories))
             RETURNING id, name, icon, position, created_at, updated_at",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.icon)
        .fetch_one(pool)
        .await?;
        Ok(category)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateCategory,
    ) -> Result<Self, CategoryError> {
        let existing = Self::find_by_id(pool, id).await?;
        let name = data.name.clone().unwrap_or(existing.name);
        let icon = data.icon.clone().or(existing.icon);

        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories
             SET name = ?, icon = ?, updated_at = datetime('now', 'subsec')
             WHERE id = ?
             RETURNING id, name, icon, position, created_at, updated_at",
        )
        .bind(name)
        .bind(icon)
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(category)
    }

    /// Items in the category are removed with it.
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<(), CategoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(CategoryError::NotFound);
        }
        Ok(())
    }
}
