use crate::models::Image;
use crate::Database;
use anyhow::Result;

pub fn register_image(
    db: &Database,
    filename: &str,
    original_name: &str,
    mime_type: &str,
    size_bytes: i64,
    alt_text: &str,
    uploaded_by: Option<i64>,
) -> Result<i64> {
    let conn = db.get()?;
    conn.execute(
        r#"
        INSERT INTO images (filename, original_name, mime_type, size_bytes, alt_text, uploaded_by)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
        (
            filename,
            original_name,
            mime_type,
            size_bytes,
            alt_text,
            uploaded_by,
        ),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_image(db: &Database, id: i64) -> Result<Option<Image>> {
    use crate::services::validation::ImageLookup;
    db.find_image_by_id(id)
}
