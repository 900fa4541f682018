//! Game store.
//!
//! One SQLite row per game; the piece list is kept as an opaque JSON column and
//! never validated here. Every read and write is scoped by `(id, owner)`, so a
//! game belonging to someone else looks exactly like a missing one.
//!
//! Calls are blocking; HTTP handlers run them through `web::block`.

use chrono::{DateTime, SubsecRound, Utc};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use uuid::Uuid;

use crate::config::server::DB_POOL_SIZE;
use crate::game::types::{GameId, OwnerId};

pub type Pool = r2d2::Pool<SqliteConnectionManager>;
pub type Connection = r2d2::PooledConnection<SqliteConnectionManager>;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS games (
    id          TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    pieces      TEXT NOT NULL DEFAULT '[]',
    rules       TEXT NOT NULL DEFAULT '',
    owner_id    TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS games_by_owner ON games (owner_id, updated_at);
";

const COLUMNS: &str = "id, title, pieces, rules, owner_id, created_at, updated_at";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),
}

/// A stored game, serialized as the API returns it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: GameId,
    pub title: String,
    pub pieces: Value,
    pub rules: String,
    pub user_id: OwnerId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Content of a game being created.
#[derive(Debug, Clone)]
pub struct NewGame {
    pub title: String,
    pub pieces: Value,
    pub rules: String,
}

/// Fields to overwrite on update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct GameChanges {
    pub title: Option<String>,
    pub pieces: Option<Value>,
    pub rules: Option<String>,
}

#[derive(Clone)]
pub struct GameStore {
    pool: Pool,
}

impl GameStore {
    /// Open (and create if needed) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let pool = r2d2::Pool::builder()
            .max_size(DB_POOL_SIZE)
            .build(SqliteConnectionManager::file(path))?;
        let store = Self { pool };
        store.migrate()?;
        Ok(store)
    }

    /// Private in-memory database. A single connection is kept open for the
    /// store's lifetime, since closing it would drop the data.
    pub fn in_memory() -> Result<Self, StoreError> {
        let pool = r2d2::Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(SqliteConnectionManager::memory())?;
        let store = Self { pool };
        store.migrate()?;
        Ok(store)
    }

    fn conn(&self) -> Result<Connection, StoreError> {
        Ok(self.pool.get()?)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// All games of `owner`, most recently updated first.
    pub fn list_by_owner(&self, owner: OwnerId) -> Result<Vec<GameRecord>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM games WHERE owner_id = ?1 ORDER BY updated_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map(params![owner.to_string()], game_from_row)?;

        let mut games = Vec::new();
        for game in rows {
            games.push(game?);
        }
        Ok(games)
    }

    pub fn find(&self, id: GameId, owner: OwnerId) -> Result<Option<GameRecord>, StoreError> {
        let conn = self.conn()?;
        find_(&conn, id, owner)
    }

    pub fn create(&self, owner: OwnerId, game: NewGame) -> Result<GameRecord, StoreError> {
        let now = now();
        let record = GameRecord {
            id: Uuid::new_v4(),
            title: game.title,
            pieces: game.pieces,
            rules: game.rules,
            user_id: owner,
            created_at: now,
            updated_at: now,
        };
        self.conn()?.execute(
            &format!("INSERT INTO games ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            params![
                record.id.to_string(),
                record.title,
                record.pieces,
                record.rules,
                record.user_id.to_string(),
                record.created_at,
                record.updated_at,
            ],
        )?;
        Ok(record)
    }

    /// Overwrite the given fields. `None` if the game does not exist for `owner`.
    pub fn update(
        &self,
        id: GameId,
        owner: OwnerId,
        changes: GameChanges,
    ) -> Result<Option<GameRecord>, StoreError> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE games SET
                title = COALESCE(?1, title),
                pieces = COALESCE(?2, pieces),
                rules = COALESCE(?3, rules),
                updated_at = ?4
             WHERE id = ?5 AND owner_id = ?6",
            params![
                changes.title,
                changes.pieces,
                changes.rules,
                now(),
                id.to_string(),
                owner.to_string(),
            ],
        )?;
        if updated == 0 {
            return Ok(None);
        }
        find_(&conn, id, owner)
    }

    /// Remove a game. False if it does not exist for `owner`.
    pub fn delete(&self, id: GameId, owner: OwnerId) -> Result<bool, StoreError> {
        let deleted = self.conn()?.execute(
            "DELETE FROM games WHERE id = ?1 AND owner_id = ?2",
            params![id.to_string(), owner.to_string()],
        )?;
        Ok(deleted > 0)
    }
}

/// Millisecond precision, which is what the API exposes.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn find_(conn: &Connection, id: GameId, owner: OwnerId) -> Result<Option<GameRecord>, StoreError> {
    let game = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM games WHERE id = ?1 AND owner_id = ?2"),
            params![id.to_string(), owner.to_string()],
            game_from_row,
        )
        .optional()?;
    Ok(game)
}

fn uuid_column(row: &Row, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn game_from_row(row: &Row) -> rusqlite::Result<GameRecord> {
    Ok(GameRecord {
        id: uuid_column(row, 0)?,
        title: row.get(1)?,
        pieces: row.get(2)?,
        rules: row.get(3)?,
        user_id: uuid_column(row, 4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
