use anyhow::Result;
use libsql::{Builder, Connection};
use std::{path::Path, sync::Arc};
use tokio::sync::RwLock;

use crate::constants::PREFERENCES_DB_FILE;

const CREATE_PREFERENCES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS preferences (
    key    TEXT PRIMARY KEY NOT NULL,
    value  TEXT NOT NULL
);
"#;

pub type Db = Arc<RwLock<Connection>>;

/// Local preferences DB (preferences.db)
pub async fn init_preferences_db(data_dir: &str) -> Result<Db> {
    tokio::fs::create_dir_all(data_dir).await?;
    let path = Path::new(data_dir).join(PREFERENCES_DB_FILE);
    let db = Builder::new_local(path).build().await?;
    let conn = db.connect()?;

    conn.execute(CREATE_PREFERENCES_TABLE, ()).await?;
    Ok(Arc::new(RwLock::new(conn)))
}

/// Key-value store persisted on disk, the client's equivalent of app preferences.
#[derive(Clone)]
pub struct PreferenceStore {
    db: Db,
}

impl PreferenceStore {
    pub async fn open(data_dir: &str) -> Result<Self> {
        let db = init_preferences_db(data_dir).await?;
        Ok(Self { db })
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.db.read().await;
        let mut rows = conn
            .query("SELECT value FROM preferences WHERE key = ?", [key])
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.db.write().await;
        conn.execute(
            "INSERT INTO preferences (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (key, value),
        )
        .await?;
        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        let conn = self.db.write().await;
        conn.execute("DELETE FROM preferences WHERE key = ?", [key])
            .await?;
        Ok(())
    }
}
