//! SQLite-backed credential store using sqlx.
//!
//! Schema: `credentials(scope, token, expires_at, updated_at)` with `scope`
//! as primary key. The scope is normally the client id, so rotating the app
//! credentials never reuses a token issued to a different client.

use async_trait::async_trait;
use goofer_types::{CachedCredential, CredentialStore, GooferError, traits::Result};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;

/// A persistent [`CredentialStore`] that survives process restarts.
pub struct SqliteCredentialStore {
    /// Connection pool to the `SQLite` database.
    pool: SqlitePool,
    scope: String,
}

impl SqliteCredentialStore {
    /// Connects to a `SQLite` database (e.g. `"sqlite:./goofer.db"` or `"sqlite::memory:"`).
    ///
    /// Automatically creates the database file if it does not exist and
    /// ensures the schema is present.
    ///
    /// # Errors
    ///
    /// Returns a [`sqlx::Error`] if the connection or table creation fails.
    pub async fn new(
        database_url: &str,
        scope: impl Into<String>,
    ) -> std::result::Result<Self, sqlx::Error> {
        let opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // A single connection keeps `sqlite::memory:` databases shared.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await?;
        Self::migrate(&pool).await?;
        Ok(Self {
            pool,
            scope: scope.into(),
        })
    }

    async fn migrate(pool: &SqlitePool) -> std::result::Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS credentials (
                scope       TEXT    PRIMARY KEY NOT NULL,
                token       TEXT    NOT NULL,
                expires_at  INTEGER NOT NULL,
                updated_at  INTEGER NOT NULL DEFAULT (unixepoch())
            )",
        )
        .execute(pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn load(&self) -> Result<Option<CachedCredential>> {
        let row: Option<(String, i64)> =
            sqlx::query_as("SELECT token, expires_at FROM credentials WHERE scope = ?")
                .bind(&self.scope)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            None => Ok(None),
            Some((token, expires_at)) => {
                let expires_at = u64::try_from(expires_at)
                    .map_err(|e| GooferError::Storage(format!("corrupt expires_at: {e}")))?;
                Ok(Some(CachedCredential::new(token, expires_at)))
            }
        }
    }

    async fn save(&self, credential: &CachedCredential) -> Result<()> {
        let expires_at = i64::try_from(credential.expires_at)
            .map_err(|e| GooferError::Storage(format!("expires_at out of range: {e}")))?;
        sqlx::query(
            "INSERT INTO credentials (scope, token, expires_at)
             VALUES (?, ?, ?)
             ON CONFLICT(scope) DO UPDATE SET
                 token = excluded.token,
                 expires_at = excluded.expires_at,
                 updated_at = unixepoch()",
        )
        .bind(&self.scope)
        .bind(&credential.token)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        tracing::debug!(scope = %self.scope, expires_at, "credential persisted");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM credentials WHERE scope = ?")
            .bind(&self.scope)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
