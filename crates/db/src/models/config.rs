use executors::env::EnvironmentConfig;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sqlx::SqlitePool;
use thiserror::Error;

const SETTINGS_KEY: &str = "settings";
const ENVIRONMENT_KEY: &str = "environment";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// UI-facing application settings. Stored as one JSON document so new fields
/// only need a serde default, not a migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme: String,
    /// What the window close button does: "minimize" or "exit".
    pub close_behavior: String,
    pub auto_minimize_after_run: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            close_behavior: "minimize".to_string(),
            auto_minimize_after_run: false,
        }
    }
}

impl Settings {
    pub async fn load(pool: &SqlitePool) -> Result<Self, ConfigError> {
        load_json(pool, SETTINGS_KEY).await
    }

    pub async fn save(&self, pool: &SqlitePool) -> Result<(), ConfigError> {
        save_json(pool, SETTINGS_KEY, self).await
    }
}

/// Runtime configuration lives beside settings in the same kv table but under
/// its own key, so saving one never clobbers the other.
pub async fn load_environment(pool: &SqlitePool) -> Result<EnvironmentConfig, ConfigError> {
    load_json(pool, ENVIRONMENT_KEY).await
}

pub async fn save_environment(
    pool: &SqlitePool,
    environment: &EnvironmentConfig,
) -> Result<(), ConfigError> {
    save_json(pool, ENVIRONMENT_KEY, environment).await
}

async fn load_json<T>(pool: &SqlitePool, key: &str) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default,
{
    let stored: Option<String> =
        sqlx::query_scalar("SELECT value FROM app_config WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;
    match stored {
        Some(value) => Ok(serde_json::from_str(&value)?),
        None => Ok(T::default()),
    }
}

async fn save_json<T: Serialize>(pool: &SqlitePool, key: &str, value: &T) -> Result<(), ConfigError> {
    let serialized = serde_json::to_string(value)?;
    sqlx::query(
        "INSERT INTO app_config (key, value) VALUES (?, ?)
         ON CONFLICT (key) DO UPDATE
         SET value = excluded.value, updated_at = datetime('now', 'subsec')",
    )
    .bind(key)
    .bind(serialized)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use executors::env::JavaEnvironment;

    use super::*;
    use crate::test_support::test_db;

    #[tokio::test]
    async fn missing_settings_fall_back_to_defaults() {
        let (_dir, db) = test_db().await;
        let settings = Settings::load(&db.pool).await.unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.close_behavior, "minimize");
    }

    #[tokio::test]
    async fn settings_survive_a_save_load_cycle() {
        let (_dir, db) = test_db().await;
        let settings = Settings {
            theme: "dark".to_string(),
            close_behavior: "exit".to_string(),
            auto_minimize_after_run: true,
        };
        settings.save(&db.pool).await.unwrap();
        assert_eq!(Settings::load(&db.pool).await.unwrap(), settings);
    }

    #[tokio::test]
    async fn environment_saves_independently_of_settings() {
        let (_dir, db) = test_db().await;
        Settings::default().save(&db.pool).await.unwrap();

        let environment = EnvironmentConfig {
            python: r"C:\Python311\python.exe".to_string(),
            java_environments: vec![JavaEnvironment {
                id: "17".to_string(),
                name: "jdk17".to_string(),
                path: r"C:\jdk17\bin".to_string(),
            }],
            default_java_environment_id: Some("17".to_string()),
            ..Default::default()
        };
        save_environment(&db.pool, &environment).await.unwrap();

        assert_eq!(load_environment(&db.pool).await.unwrap(), environment);
        assert_eq!(
            Settings::load(&db.pool).await.unwrap(),
            Settings::default()
        );
    }
}
