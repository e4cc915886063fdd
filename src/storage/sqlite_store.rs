use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::entity::{Entry, EntryId, User, ValidEntry};
use crate::error::{MoodlogError, Result};

const ENTRY_COLUMNS: &str = "SELECT p.id, body, mood, date, created, author_id, username
     FROM post p JOIN user u ON p.author_id = u.id";

/// SQLite-backed storage for users and their mood entries
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Create a new database file with the schema in place
    pub fn init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Err(MoodlogError::AlreadyInitialized(path.display().to_string()));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        Self::connect(Connection::open(path)?, Some(path.to_path_buf()))
    }

    /// Open an existing database file
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MoodlogError::NotInitialized(path.display().to_string()));
        }

        Self::connect(Connection::open(path)?, Some(path.to_path_buf()))
    }

    /// Open a throwaway database, used by tests and demos
    pub fn open_in_memory() -> Result<Self> {
        Self::connect(Connection::open_in_memory()?, None)
    }

    fn connect(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        let store = Self { conn, path };
        store.init_schema()?;
        Ok(store)
    }

    /// Path of the database file, `None` when in memory
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Initialize the database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL
            );

            CREATE TABLE IF NOT EXISTS post (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                author_id INTEGER NOT NULL,
                created TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
                body TEXT NOT NULL,
                mood TEXT NOT NULL,
                date TEXT NOT NULL,
                FOREIGN KEY (author_id) REFERENCES user (id)
            );

            CREATE INDEX IF NOT EXISTS idx_post_author ON post(author_id);
            ",
        )?;
        Ok(())
    }

    /// Register a new user
    pub fn create_user(&self, username: &str) -> Result<User> {
        if self.find_user(username)?.is_some() {
            return Err(MoodlogError::UserExists(username.to_string()));
        }

        self.conn
            .execute("INSERT INTO user (username) VALUES (?1)", [username])?;

        Ok(User {
            id: self.conn.last_insert_rowid(),
            username: username.to_string(),
        })
    }

    /// Look up a user by username
    pub fn find_user(&self, username: &str) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username FROM user WHERE username = ?1",
                [username],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    /// All registered users, oldest first
    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, username FROM user ORDER BY id")?;

        let users = stmt
            .query_map([], |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Every entry with its author, most recently created first
    pub fn list_entries(&self) -> Result<Vec<Entry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_COLUMNS} ORDER BY created DESC, p.id DESC"))?;

        let entries = stmt
            .query_map([], entry_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// A single entry with its author
    pub fn get_entry(&self, id: EntryId) -> Result<Option<Entry>> {
        let entry = self
            .conn
            .query_row(&format!("{ENTRY_COLUMNS} WHERE p.id = ?1"), [id], entry_from_row)
            .optional()?;
        Ok(entry)
    }

    /// Insert an entry and return its id
    pub fn insert_entry(&self, author_id: i64, entry: &ValidEntry) -> Result<EntryId> {
        self.conn.execute(
            "INSERT INTO post (body, mood, date, author_id) VALUES (?1, ?2, ?3, ?4)",
            params![entry.body, entry.mood, entry.date, author_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Overwrite the body, mood and date of an entry
    pub fn update_entry(&self, id: EntryId, entry: &ValidEntry) -> Result<()> {
        self.conn.execute(
            "UPDATE post SET body = ?1, mood = ?2, date = ?3 WHERE id = ?4",
            params![entry.body, entry.mood, entry.date, id],
        )?;
        Ok(())
    }

    /// Remove an entry permanently
    pub fn delete_entry(&self, id: EntryId) -> Result<()> {
        self.conn.execute("DELETE FROM post WHERE id = ?1", [id])?;
        Ok(())
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(0)?,
        body: row.get(1)?,
        mood: row.get(2)?,
        date: row.get(3)?,
        created: row.get(4)?,
        author_id: row.get(5)?,
        username: row.get(6)?,
    })
}

impl From<rusqlite::Error> for MoodlogError {
    fn from(e: rusqlite::Error) -> Self {
        MoodlogError::Storage(format!("SQLite error: {}", e))
    }
}
