//! SQLite-backed share store.
//!
//! One row per unconsumed share in a single `secrets` table. There is no
//! history table: consuming a share deletes its row, and the delete returns
//! the row in the same statement so there is no window between "read" and
//! "remove" for a second caller to slip into.
//!
//! Consumed rows leave nothing behind: deletes run with `secure_delete` and
//! the journal is a rollback journal that is removed at commit.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sqlx::sqlite::{
    Sqlite, SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::Row;
use tracing::debug;
use zeroize::Zeroizing;

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, ShareError};
use crate::store::SecretStore;
use crate::types::{Nonce, SecretId, SecretKey, SecretRecord};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS secrets (
    id          TEXT    PRIMARY KEY NOT NULL,
    ciphertext  BLOB    NOT NULL,
    nonce       BLOB    NOT NULL,
    key         BLOB    NOT NULL,
    created_at  INTEGER NOT NULL,
    expires_at  INTEGER NOT NULL
)
"#;

const CREATE_EXPIRY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS secrets_expires_at ON secrets (expires_at)";

const MAX_CONNECTIONS: u32 = 4;

/// A share store persisted in a SQLite database file.
///
/// Timestamps are stored as unix milliseconds.
#[derive(Clone)]
pub struct SqliteSecretStore {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqliteSecretStore {
    /// Open (or create) the database at `path`, using wall-clock time.
    pub async fn open(path: &Path) -> Result<Self> {
        Self::open_with_clock(path, Arc::new(SystemClock)).await
    }

    /// Open (or create) the database at `path`, checking expiry against `clock`.
    pub async fn open_with_clock(path: &Path, clock: Arc<dyn Clock>) -> Result<Self> {
        prepare_file(path).await?;

        // Rollback journal rather than WAL: a WAL file keeps consumed rows
        // until the next checkpoint. secure_delete zeroes freed cells.
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Delete)
            .pragma("secure_delete", "on")
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        sqlx::query(CREATE_EXPIRY_INDEX).execute(&pool).await?;

        debug!(path = %path.display(), "opened sqlite share store");
        Ok(Self { pool, clock })
    }

    /// Close the connection pool, waiting for in-flight queries.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Create the parent directory (0700) and the database file (0600) before
/// SQLite opens it. SQLite gives its journal files the database file's mode.
async fn prepare_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            let mut builder = tokio::fs::DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            builder.mode(0o700);
            builder
                .create(parent)
                .await
                .map_err(|e| ShareError::Storage(e.to_string()))?;
        }
    }

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true);
    #[cfg(unix)]
    options.mode(0o600);
    options
        .open(path)
        .await
        .map_err(|e| ShareError::Storage(e.to_string()))?;

    restrict_permissions(path).await
}

/// Database file is owner read/write only on Unix.
async fn restrict_permissions(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        tokio::fs::set_permissions(path, perms)
            .await
            .map_err(|e| ShareError::Storage(e.to_string()))?;
    }
    #[cfg(not(unix))]
    let _ = path;

    Ok(())
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or(ShareError::IntegrityError)
}

/// Read one column. A value that does not decode is an integrity failure:
/// the row was written by something other than this store.
fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T>
where
    T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    row.try_get(name).map_err(|_| ShareError::IntegrityError)
}

/// Rebuild a record from a returned row. Malformed columns are an integrity
/// failure, not a storage failure.
fn record_from_row(row: &SqliteRow) -> Result<SecretRecord> {
    let id: String = column(row, "id")?;
    let ciphertext: Vec<u8> = column(row, "ciphertext")?;
    let nonce: Vec<u8> = column(row, "nonce")?;
    let key: Zeroizing<Vec<u8>> = Zeroizing::new(column(row, "key")?);
    let created_at: i64 = column(row, "created_at")?;
    let expires_at: i64 = column(row, "expires_at")?;

    let nonce: Nonce = nonce
        .as_slice()
        .try_into()
        .map_err(|_| ShareError::IntegrityError)?;
    let key = SecretKey::from_slice(&key).ok_or(ShareError::IntegrityError)?;

    Ok(SecretRecord {
        id: SecretId::from_token(id),
        ciphertext,
        nonce,
        key,
        created_at: from_millis(created_at)?,
        expires_at: from_millis(expires_at)?,
    })
}

#[async_trait]
impl SecretStore for SqliteSecretStore {
    async fn insert(&self, record: SecretRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO secrets (id, ciphertext, nonce, key, created_at, expires_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.as_str())
        .bind(record.ciphertext.as_slice())
        .bind(record.nonce.as_slice())
        .bind(record.key.as_bytes().as_slice())
        .bind(record.created_at.timestamp_millis())
        .bind(record.expires_at.timestamp_millis())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(ShareError::AlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn consume(&self, id: &SecretId) -> Result<SecretRecord> {
        let now = self.clock.now();
        let row = sqlx::query(
            r#"
            DELETE FROM secrets
            WHERE id = ?
            RETURNING id, ciphertext, nonce, key, created_at, expires_at
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Err(ShareError::NotFound);
        };

        let record = record_from_row(&row)?;
        if record.is_expired_at(now) {
            debug!("evicted expired share on access");
            return Err(ShareError::NotFound);
        }
        Ok(record)
    }

    async fn peek_exists(&self, id: &SecretId) -> Result<bool> {
        let now = self.clock.now().timestamp_millis();
        let row = sqlx::query("SELECT 1 FROM secrets WHERE id = ? AND expires_at > ?")
            .bind(id.as_str())
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn sweep_expired(&self) -> Result<usize> {
        let now = self.clock.now().timestamp_millis();

        let expired: Vec<String> =
            sqlx::query_scalar::<_, String>("SELECT id FROM secrets WHERE expires_at <= ?")
                .bind(now)
                .fetch_all(&self.pool)
                .await?;

        // One statement per row keeps each write lock to a single removal.
        let mut removed = 0;
        for id in &expired {
            let done = sqlx::query("DELETE FROM secrets WHERE id = ? AND expires_at <= ?")
                .bind(id.as_str())
                .bind(now)
                .execute(&self.pool)
                .await?;
            removed += done.rows_affected() as usize;
        }
        Ok(removed)
    }

    async fn len(&self) -> Result<usize> {
        let now = self.clock.now().timestamp_millis();
        let count: i64 =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM secrets WHERE expires_at > ?")
                .bind(now)
                .fetch_one(&self.pool)
                .await?;
        Ok(count.max(0) as usize)
    }

    fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }
}
