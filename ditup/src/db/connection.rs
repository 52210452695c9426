//! Database connection management.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::Connection;
use tracing::{debug, info};

use super::{DbError, DbResult};

/// Shared handle to the ditup database.
///
/// Cloning is cheap; all clones serialize access through one connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Default database location (`~/.ditup/ditup.db`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".ditup").join("ditup.db"))
    }

    /// Open or create the database at a specific path.
    pub fn open_at(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| DbError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened database");
        Self::from_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        debug!("opened in-memory database");
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        initialize(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` with exclusive access to the connection.
    pub fn call<T>(&self, f: impl FnOnce(&mut Connection) -> DbResult<T>) -> DbResult<T> {
        let mut conn = self.conn.lock().map_err(|_| DbError::Poisoned)?;
        f(&mut conn)
    }
}

/// Initialize the database schema.
fn initialize(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r"
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT UNIQUE,
            email_temporary TEXT,
            password_hash TEXT NOT NULL,
            email_verified INTEGER NOT NULL DEFAULT 0,
            email_verification_code_hash TEXT,
            email_verification_created INTEGER,
            given_name TEXT NOT NULL DEFAULT '',
            family_name TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            created INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            tagname TEXT NOT NULL UNIQUE,
            creator_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
            created INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS user_tag (
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            story TEXT NOT NULL DEFAULT '',
            relevance INTEGER NOT NULL DEFAULT 3,
            created INTEGER NOT NULL,
            PRIMARY KEY (user_id, tag_id)
        );

        CREATE TABLE IF NOT EXISTS contacts (
            from_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            to_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            trust INTEGER NOT NULL,
            reference TEXT NOT NULL DEFAULT '',
            message TEXT,
            is_confirmed INTEGER NOT NULL DEFAULT 0,
            created INTEGER NOT NULL,
            confirmed INTEGER,
            PRIMARY KEY (from_id, to_id),
            CHECK (from_id <> to_id)
        );

        CREATE TABLE IF NOT EXISTS messages (
            id TEXT PRIMARY KEY,
            from_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            to_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            body TEXT NOT NULL,
            read INTEGER NOT NULL DEFAULT 0,
            created INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_user_tag_tag_id ON user_tag(tag_id);
        CREATE INDEX IF NOT EXISTS idx_contacts_to_id ON contacts(to_id);
        CREATE INDEX IF NOT EXISTS idx_messages_pair ON messages(from_id, to_id, created);
        CREATE INDEX IF NOT EXISTS idx_messages_to_read ON messages(to_id, read);
        ",
    )?;
    Ok(())
}
