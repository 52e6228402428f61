use chrono::{DateTime, Utc};
use executors::item::{ItemType, LaunchableItem};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ItemError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("Item not found")]
    NotFound,
}

/// Persisted form of a shortcut. `item_type` is stored as text so rows
/// written by older versions with retired types still load.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub item_type: String,
    pub command: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub launch_params: Option<String>,
    pub run_in_terminal: bool,
    pub is_favorite: bool,
    pub java_environment_id: Option<String>,
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateItem {
    pub category_id: Uuid,
    pub name: String,
    pub item_type: String,
    pub command: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub launch_params: Option<String>,
    #[serde(default)]
    pub run_in_terminal: bool,
    #[serde(default)]
    pub is_favorite: bool,
    pub java_environment_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItem {
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub item_type: Option<String>,
    pub command: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub launch_params: Option<String>,
    pub run_in_terminal: Option<bool>,
    pub is_favorite: Option<bool>,
    pub java_environment_id: Option<String>,
}

const ITEM_COLUMNS: &str = "id, category_id, name, item_type, command, icon, description, \
     launch_params, run_in_terminal, is_favorite, java_environment_id, position, \
     created_at, updated_at";

impl Item {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, ItemError> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY position, created_at"
        ))
        .fetch_all(pool)
        .await?;
        Ok(items)
    }

    pub async fn find_by_category(
        pool: &SqlitePool,
        category_id: Uuid,
    ) -> Result<Vec<Self>, ItemError> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE category_id = ? ORDER BY position, created_at"
        ))
        .bind(category_id)
        .fetch_all(pool)
        .await?;
        Ok(items)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Self, ItemError> {
        sqlx::query_as::<_, Item>(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or(ItemError::NotFound)
    }

    pub async fn create(pool: &SqlitePool, data: &CreateItem) -> Result<Self, ItemError> {
        let id = Uuid::new_v4();
        let item = sqlx::query_as::<_, Item>(&format!(
            "INSERT INTO items (id, category_id, name, item_type, command, icon, description, \
                                launch_params, run_in_terminal, is_favorite, java_environment_id, \
                                position)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                     (SELECT COALESCE(MAX(position), -1) + 1 FROM items WHERE category_id = ?))
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(id)
        .bind(data.category_id)
        .bind(&data.name)
        .bind(&data.item_type)
        .bind(&data.command)
        .bind(&data.icon)
        .bind(&data.description)
        .bind(&data.launch_params)
        .bind(data.run_in_terminal)
        .bind(data.is_favorite)
        .bind(&data.java_environment_id)
        .bind(data.category_id)
        .fetch_one(pool)
        .await?;
        Ok(item)
    }

    pub async fn update(pool: &SqlitePool, id: Uuid, data: &UpdateItem) -> Result<Self, ItemError> {
        let existing = Self::find_by_id(pool, id).await?;

        let item = sqlx::query_as::<_, Item>(&format!(
            "UPDATE items
             SET category_id = ?, name = ?, item_type = ?, command = ?, icon = ?,
                 description = ?, launch_params = ?, run_in_terminal = ?, is_favorite = ?,
                 java_environment_id = ?, updated_at = datetime('now', 'subsec')
             WHERE id = ?
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(data.category_id.unwrap_or(existing.category_id))
        .bind(data.name.clone().unwrap_or(existing.name))
        .bind(data.item_type.clone().unwrap_or(existing.item_type))
        .bind(data.command.clone().unwrap_or(existing.command))
        .bind(data.icon.clone().or(existing.icon))
        .bind(data.description.clone().or(existing.description))
        .bind(data.launch_params.clone().or(existing.launch_params))
        .bind(data.run_in_terminal.unwrap_or(existing.run_in_terminal))
        .bind(data.is_favorite.unwrap_or(existing.is_favorite))
        .bind(
            data.java_environment_id
                .clone()
                .or(existing.java_environment_id),
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(item)
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<(), ItemError> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ItemError::NotFound);
        }
        Ok(())
    }

    /// Convert the stored row into the execution pipeline's input form.
    pub fn to_launchable(&self) -> LaunchableItem {
        LaunchableItem {
            id: self.id,
            name: self.name.clone(),
            item_type: ItemType::parse(&self.item_type),
            command: self.command.clone(),
            launch_params: self.launch_params.clone(),
            run_in_terminal: self.run_in_terminal,
            java_environment_id: self.java_environment_id.clone(),
        }
    }
}
