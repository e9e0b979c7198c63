use crate::models::{Image, User, UserRole};
use crate::services::slug::SlugStore;
use crate::services::validation::{ImageLookup, UserLookup};
use anyhow::Result;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

pub type DbPool = Pool<SqliteConnectionManager>;

pub struct Database {
    pool: DbPool,
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

impl Database {
    pub fn open(path: &str) -> Result<Self> {
        let path = Path::new(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let conn = pool.get()?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

        Ok(Self { pool })
    }

    /// Named shared-cache in-memory database; every pooled connection sees
    /// the same data, which is what tests want.
    pub fn open_memory(name: &str) -> Result<Self> {
        let uri = format!("file:{name}?mode=memory&cache=shared");
        let manager = SqliteConnectionManager::file(uri).with_flags(
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        );
        let pool = Pool::builder().max_size(4).build(manager)?;

        let conn = pool.get()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        Ok(Self { pool })
    }

    pub fn get(&self) -> Result<r2d2::PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.get()?;
        run_migrations(&conn)?;
        Ok(())
    }
}

impl SlugStore for Database {
    fn slug_exists(&self, candidate: &str, exclude_id: Option<i64>) -> Result<bool> {
        let conn = self.get()?;
        let count: i64 = match exclude_id {
            Some(id) => conn.query_row(
                "SELECT COUNT(*) FROM articles WHERE slug = ? AND id != ?",
                rusqlite::params![candidate, id],
                |row| row.get(0),
            )?,
            None => conn.query_row(
                "SELECT COUNT(*) FROM articles WHERE slug = ?",
                [candidate],
                |row| row.get(0),
            )?,
        };
        Ok(count > 0)
    }
}

impl UserLookup for Database {
    fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let conn = self.get()?;
        let user = conn
            .query_row(
                "SELECT id, username, email, role, created_at FROM users WHERE id = ?",
                [id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }
}

impl ImageLookup for Database {
    fn find_image_by_id(&self, id: i64) -> Result<Option<Image>> {
        let conn = self.get()?;
        let image = conn
            .query_row(
                "SELECT id, filename, original_name, mime_type, size_bytes, alt_text, uploaded_by, created_at FROM images WHERE id = ?",
                [id],
                |row| {
                    Ok(Image {
                        id: row.get(0)?,
                        filename: row.get(1)?,
                        original_name: row.get(2)?,
                        mime_type: row.get(3)?,
                        size_bytes: row.get(4)?,
                        alt_text: row.get(5)?,
                        uploaded_by: row.get(6)?,
                        created_at: row.get(7)?,
                    })
                },
            )
            .optional()?;
        Ok(image)
    }
}

pub(crate) fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        role: row.get::<_, String>(3)?.parse().unwrap_or(UserRole::Reporter),
        created_at: row.get(4)?,
    })
}

fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )?;

    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    let migrations: Vec<(i32, &str)> = vec![(1, include_str!("migrations/001_initial.sql"))];

    for (version, sql) in migrations {
        if version > current_version {
            tracing::info!("Running migration {}", version);
            conn.execute_batch(sql)?;
            conn.execute(
                "INSERT INTO schema_migrations (version) VALUES (?)",
                [version],
            )?;
        }
    }

    Ok(())
}
