use rusqlite::types::ValueRef;
use rusqlite::{params, params_from_iter, Connection};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::data::{GameRecord, GameSummary};
use super::query::Query;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No game found with GameId = {game_id}")]
    NotFound { game_id: String },
}

/// The Library manages the SQLite game catalog.
/// It holds the one connection the process uses for its whole lifetime.
pub struct Library {
    conn: Connection,
    db_path: PathBuf,
}

impl Library {
    /// Open (or create) the catalog at `db_path`.
    ///
    /// The parent directory is created if needed and the `games` table is
    /// created if it does not exist yet. Existing tables are never altered.
    pub fn open(db_path: &Path) -> Result<Self, LibraryError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;
        log::info!("Using database at {}", db_path.display());

        let library = Library {
            conn,
            db_path: db_path.to_path_buf(),
        };
        library.init_schema()?;

        Ok(library)
    }

    /// An in-memory catalog with the full schema
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, LibraryError> {
        let library = Library {
            conn: Connection::open_in_memory()?,
            db_path: PathBuf::from(":memory:"),
        };
        library.init_schema()?;
        Ok(library)
    }

    #[cfg(test)]
    pub fn conn_for_tests(&self) -> &Connection {
        &self.conn
    }

    /// Create the games table and its title index if they don't exist.
    fn init_schema(&self) -> Result<(), LibraryError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS games (
                GameId      TEXT PRIMARY KEY,
                ArcadeGame  INTEGER DEFAULT 0,
                Eboot       TEXT DEFAULT '',
                Favorite    INTEGER DEFAULT 0,
                GameTitle   TEXT DEFAULT 'Unknown',
                Genre       TEXT DEFAULT 'Unknown',
                Icon0       TEXT DEFAULT '',
                Loader      TEXT DEFAULT '',
                Param       TEXT DEFAULT '',
                Pic1        TEXT DEFAULT '',
                Played      INTEGER DEFAULT 0,
                PSN         INTEGER DEFAULT 0,
                Format      TEXT DEFAULT 'PlayStation 3',
                Publisher   TEXT DEFAULT 'Unknown',
                Region      TEXT DEFAULT 'Unknown',
                ReleaseDate TEXT DEFAULT 'Unknown',
                Snd0        TEXT DEFAULT '',
                IconBlob    BLOB,
                Have        INTEGER DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS idx_games_title ON games(GameTitle);",
        )?;
        Ok(())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Total number of games in the catalog
    pub fn game_count(&self) -> Result<usize, LibraryError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Run a browse scan built by [`query::build`](super::query::build).
    ///
    /// The full result set is materialized before returning. An icon cell
    /// holding anything other than a BLOB reads as no icon.
    pub fn scan(&self, query: &Query) -> Result<Vec<GameSummary>, LibraryError> {
        log::debug!("scan: {} {:?}", query.sql, query.params);

        let mut stmt = self.conn.prepare(&query.sql)?;
        let rows = stmt.query_map(params_from_iter(query.params.iter()), |row| {
            Ok(GameSummary {
                game_id: row.get(0)?,
                title: row.get(1)?,
                icon: match row.get_ref(2)? {
                    ValueRef::Blob(bytes) => Some(bytes.to_vec()),
                    _ => None,
                },
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Whether a game with this id exists
    pub fn contains(&self, game_id: &str) -> Result<bool, LibraryError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM games WHERE GameId = ?1)",
            params![game_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Replace the icon of one game, leaving every other column alone
    pub fn update_icon(&self, game_id: &str, icon: &[u8]) -> Result<(), LibraryError> {
        let changed = self.conn.execute(
            "UPDATE games SET IconBlob = ?1 WHERE GameId = ?2",
            params![icon, game_id],
        )?;

        if changed == 0 {
            return Err(LibraryError::NotFound {
                game_id: game_id.to_string(),
            });
        }
        Ok(())
    }

    /// Insert or replace `records` keyed by GameId, committing once at the end.
    /// Returns the number of rows written.
    pub fn upsert_games(&mut self, records: &[GameRecord]) -> Result<usize, LibraryError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO games (
                    GameId, ArcadeGame, Eboot, Favorite, GameTitle, Genre,
                    Icon0, Loader, Param, Pic1, Played, PSN, Format,
                    Publisher, Region, ReleaseDate, Snd0, IconBlob, Have
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                          ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
            )?;

            for r in records {
                stmt.execute(params![
                    r.game_id,
                    r.arcade_game,
                    r.eboot,
                    r.favorite,
                    r.title,
                    r.genre,
                    r.icon0,
                    r.loader,
                    r.param,
                    r.pic1,
                    r.played,
                    r.psn,
                    r.format,
                    r.publisher,
                    r.region,
                    r.release_date,
                    r.snd0,
                    r.icon_blob,
                    r.have,
                ])?;
            }
        }
        tx.commit()?;

        Ok(records.len())
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}
