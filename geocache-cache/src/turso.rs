//! Turso (libSQL) backed cache store.
//!
//! One row per exact address in the `GeocodingCache` table. The expiry is
//! stored as Unix milliseconds and checked on every read, because nothing
//! purges stale rows until [`LibsqlCacheStore::purge_expired`] runs.
//!
//! ```text
//! GeocodingCache(
//!     address    TEXT PRIMARY KEY,
//!     payload    TEXT NOT NULL,
//!     expires_at INTEGER NOT NULL
//! )
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use libsql::{params, Builder, Connection, Database};
use tracing::{debug, info, instrument};

use geocache_core::constants::CACHE_TABLE;
use geocache_core::error::{GeocacheError, Result};
use geocache_core::traits::CacheStore;
use geocache_core::types::{expiry_after, Clock, SystemClock};

fn store_err(e: libsql::Error) -> GeocacheError {
    GeocacheError::Store(e.to_string())
}

/// Cache store backed by a libSQL database.
///
/// The connection is opened once and shared by every caller.
pub struct LibsqlCacheStore {
    _db: Database,
    conn: Connection,
    clock: Arc<dyn Clock>,
}

impl LibsqlCacheStore {
    /// Connects to a remote Turso database and ensures the table exists.
    pub async fn connect_remote(
        url: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Result<Self> {
        let url = url.into();
        let db = Builder::new_remote(url.clone(), auth_token.into())
            .build()
            .await
            .map_err(store_err)?;
        info!(url, "Connected to Turso cache database");
        Self::from_database(db, Arc::new(SystemClock)).await
    }

    /// Wraps an already-built database handle and ensures the table exists.
    pub async fn from_database(db: Database, clock: Arc<dyn Clock>) -> Result<Self> {
        let conn = db.connect().map_err(store_err)?;
        let store = Self {
            _db: db,
            conn,
            clock,
        };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {CACHE_TABLE} (
                address TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                expires_at INTEGER NOT NULL
            )"
        );
        self.conn.execute(&sql, ()).await.map_err(store_err)?;
        Ok(())
    }

    /// Deletes rows whose expiry has passed and returns how many were removed.
    #[instrument(skip(self))]
    pub async fn purge_expired(&self) -> Result<u64> {
        let now = self.clock.now().timestamp_millis();
        let sql = format!("DELETE FROM {CACHE_TABLE} WHERE expires_at <= ?1");
        let purged = self
            .conn
            .execute(&sql, params![now])
            .await
            .map_err(store_err)?;
        debug!(purged, "Purged expired cache rows");
        Ok(purged)
    }

    /// Returns the number of stored rows, expired or not.
    pub async fn len(&self) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {CACHE_TABLE}");
        let mut rows = self.conn.query(&sql, ()).await.map_err(store_err)?;
        let count = match rows.next().await.map_err(store_err)? {
            Some(row) => row.get::<i64>(0).map_err(store_err)?,
            None => 0,
        };
        Ok(count.max(0) as u64)
    }
}

#[async_trait]
impl CacheStore for LibsqlCacheStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = self.clock.now().timestamp_millis();
        let sql = format!(
            "SELECT payload FROM {CACHE_TABLE} WHERE address = ?1 AND expires_at > ?2"
        );
        let mut rows = self
            .conn
            .query(&sql, params![key, now])
            .await
            .map_err(store_err)?;

        match rows.next().await.map_err(store_err)? {
            Some(row) => Ok(Some(row.get::<String>(0).map_err(store_err)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, value))]
    async fn save(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let expires_at = expiry_after(self.clock.now(), ttl)?.timestamp_millis();
        let sql = format!(
            "INSERT INTO {CACHE_TABLE} (address, payload, expires_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(address) DO UPDATE SET
                payload = excluded.payload,
                expires_at = excluded.expires_at"
        );
        self.conn
            .execute(&sql, params![key, value, expires_at])
            .await
            .map_err(store_err)?;
        Ok(())
    }
}
