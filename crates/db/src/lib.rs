use std::str::FromStr;

use sqlx::{Error, Pool, Sqlite, SqlitePool, sqlite::SqliteConnectOptions};

pub mod models;

#[cfg(test)]
pub(crate) mod test_support {
    use super::DBProvider;

    /// Fresh migrated database in a temp dir. The dir must outlive the pool.
    pub(crate) async fn test_db() -> (tempfile::TempDir, DBProvider) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("test.sqlite").display());
        let db = DBProvider::connect(&url).await.unwrap();
        (dir, db)
    }
}

#[derive(Clone)]
pub struct DBProvider {
    pub pool: Pool<Sqlite>,
}

impl DBProvider {
    /// Open (creating if missing) the database at `database_url` and bring
    /// the schema up to date.
    pub async fn connect(database_url: &str) -> Result<DBProvider, Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(DBProvider { pool })
    }
}
