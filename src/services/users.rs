use crate::models::{User, UserRole};
use crate::Database;
use anyhow::{bail, Result};

const MAX_USERNAME_LENGTH: usize = 100;

pub fn create_user(db: &Database, username: &str, email: &str, role: UserRole) -> Result<i64> {
    if username.is_empty() {
        bail!("Username cannot be empty");
    }
    if username.len() > MAX_USERNAME_LENGTH {
        bail!("Username must be {} characters or less", MAX_USERNAME_LENGTH);
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        bail!("Username can only contain letters, numbers, underscores, and hyphens");
    }
    if email.is_empty() {
        bail!("Email cannot be empty");
    }

    let conn = db.get()?;
    conn.execute(
        "INSERT INTO users (username, email, role) VALUES (?, ?, ?)",
        (username, email, role.to_string()),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_user(db: &Database, id: i64) -> Result<Option<User>> {
    use crate::services::validation::UserLookup;
    db.find_user_by_id(id)
}

pub fn list_users(db: &Database) -> Result<Vec<User>> {
    let conn = db.get()?;
    let mut stmt =
        conn.prepare("SELECT id, username, email, role, created_at FROM users ORDER BY id")?;
    let users = stmt
        .query_map([], crate::db::row_to_user)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}
