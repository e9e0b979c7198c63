use crate::models::{Article, ArticleStatus, ArticleSubmission, ArticleSummary, LanguageCode};
use crate::services::slug;
use crate::services::validation::{self, ValidationOutcome};
use crate::Database;
use anyhow::{bail, Result};
use rusqlite::{Connection, OptionalExtension};

/// Result of a create/update attempt. Rule violations come back as data so
/// the web tier can turn them into a 400 with the full error list; only
/// infrastructure failures use the `Err` channel.
#[derive(Debug)]
pub enum WriteOutcome {
    Persisted { id: i64, slug: String },
    Invalid(ValidationOutcome),
}

pub fn create_article(db: &Database, input: ArticleSubmission) -> Result<WriteOutcome> {
    let outcome = validation::validate(&input, db, db)?;
    if !outcome.is_valid() {
        return Ok(WriteOutcome::Invalid(outcome));
    }

    let language = input
        .language_code
        .parse::<LanguageCode>()
        .unwrap_or_default();
    let status = input.status.parse::<ArticleStatus>().unwrap_or_default();

    let slug_source = slug_source(&input);
    let mut resolved = slug::generate_unique(db, slug_source, None)?;

    let now = chrono::Utc::now().to_rfc3339();
    let published_at = if status == ArticleStatus::Published {
        input.published_at.clone().or_else(|| Some(now.clone()))
    } else {
        input.published_at.clone()
    };

    let conn = db.get()?;
    let id = match insert_article(&conn, &input, language, status, &resolved, &published_at, &now) {
        Ok(id) => id,
        Err(err) if is_unique_violation(&err) => {
            // Lost the check-then-insert race to a concurrent writer; the
            // UNIQUE constraint caught it. Probe again and retry once.
            tracing::warn!("slug {} taken between check and insert, retrying", resolved);
            resolved = slug::generate_unique(db, slug_source, None)?;
            insert_article(&conn, &input, language, status, &resolved, &published_at, &now)?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("created article id={} slug={}", id, resolved);
    Ok(WriteOutcome::Persisted { id, slug: resolved })
}

pub fn update_article(db: &Database, id: i64, input: ArticleSubmission) -> Result<WriteOutcome> {
    let Some(current) = get_article_by_id(db, id)? else {
        bail!("article {id} not found");
    };

    let outcome = validation::validate(&input, db, db)?;
    if !outcome.is_valid() {
        return Ok(WriteOutcome::Invalid(outcome));
    }

    let language = input
        .language_code
        .parse::<LanguageCode>()
        .unwrap_or_default();
    let status = input.status.parse::<ArticleStatus>().unwrap_or_default();

    // The article's own row is excluded from the collision probe, so an
    // unchanged title resolves back to the slug it already holds.
    let resolved = slug::generate_unique(db, slug_source(&input), Some(id))?;

    let now = chrono::Utc::now().to_rfc3339();
    let published_at = if status == ArticleStatus::Published && current.published_at.is_none() {
        input.published_at.clone().or_else(|| Some(now.clone()))
    } else {
        current.published_at
    };

    let conn = db.get()?;
    conn.execute(
        r#"
        UPDATE articles SET language_code = ?, title = ?, slug = ?, content = ?, summary = ?,
            status = ?, published_at = ?, allow_comments = ?, cover_image_id = ?, author_id = ?,
            reporter_id = ?, seo_title = ?, seo_description = ?, seo_keywords = ?, updated_at = ?
        WHERE id = ?
        "#,
        rusqlite::params![
            language.to_string(),
            &input.title,
            &resolved,
            &input.content,
            &input.summary,
            status.to_string(),
            &published_at,
            input.allow_comments,
            input.cover_image_id,
            input.author_id,
            input.reporter_id,
            &input.seo_title,
            &input.seo_description,
            &input.seo_keywords,
            &now,
            id,
        ],
    )?;

    Ok(WriteOutcome::Persisted { id, slug: resolved })
}

pub fn delete_article(db: &Database, id: i64) -> Result<()> {
    let conn = db.get()?;
    conn.execute("DELETE FROM articles WHERE id = ?", [id])?;
    Ok(())
}

pub fn get_article_by_id(db: &Database, id: i64) -> Result<Option<Article>> {
    let conn = db.get()?;
    let article = conn
        .query_row(
            &format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = ?"),
            [id],
            row_to_article,
        )
        .optional()?;
    Ok(article)
}

pub fn get_article_by_slug(db: &Database, slug: &str) -> Result<Option<Article>> {
    let conn = db.get()?;
    let article = conn
        .query_row(
            &format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE slug = ?"),
            [slug],
            row_to_article,
        )
        .optional()?;
    Ok(article)
}

pub fn list_articles(
    db: &Database,
    language: Option<LanguageCode>,
    status: Option<ArticleStatus>,
    limit: usize,
    offset: usize,
) -> Result<Vec<ArticleSummary>> {
    let conn = db.get()?;

    let mut sql = String::from(
        "SELECT id, slug, title, language_code, status, published_at, created_at FROM articles WHERE 1=1",
    );
    let mut params: Vec<String> = Vec::new();

    if let Some(lang) = language {
        sql.push_str(" AND language_code = ?");
        params.push(lang.to_string());
    }
    if let Some(s) = status {
        sql.push_str(" AND status = ?");
        params.push(s.to_string());
    }

    sql.push_str(" ORDER BY created_at DESC LIMIT ? OFFSET ?");

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::ToSql> = params
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .chain(std::iter::once(&limit as &dyn rusqlite::ToSql))
        .chain(std::iter::once(&offset as &dyn rusqlite::ToSql))
        .collect();

    let articles = stmt
        .query_map(param_refs.as_slice(), |row| {
            Ok(ArticleSummary {
                id: row.get(0)?,
                slug: row.get(1)?,
                title: row.get(2)?,
                language_code: row
                    .get::<_, String>(3)?
                    .parse()
                    .unwrap_or(LanguageCode::En),
                status: row
                    .get::<_, String>(4)?
                    .parse()
                    .unwrap_or(ArticleStatus::Draft),
                published_at: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(articles)
}

pub fn count_articles(
    db: &Database,
    language: Option<LanguageCode>,
    status: Option<ArticleStatus>,
) -> Result<i64> {
    let conn = db.get()?;
    let mut sql = String::from("SELECT COUNT(*) FROM articles WHERE 1=1");
    let mut params: Vec<String> = Vec::new();

    if let Some(lang) = language {
        sql.push_str(" AND language_code = ?");
        params.push(lang.to_string());
    }
    if let Some(s) = status {
        sql.push_str(" AND status = ?");
        params.push(s.to_string());
    }

    let param_refs: Vec<&dyn rusqlite::ToSql> =
        params.iter().map(|s| s as &dyn rusqlite::ToSql).collect();
    let count: i64 = conn.query_row(&sql, param_refs.as_slice(), |row| row.get(0))?;
    Ok(count)
}

fn slug_source(input: &ArticleSubmission) -> &str {
    input
        .slug
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(&input.title)
}

#[allow(clippy::too_many_arguments)]
fn insert_article(
    conn: &Connection,
    input: &ArticleSubmission,
    language: LanguageCode,
    status: ArticleStatus,
    slug: &str,
    published_at: &Option<String>,
    now: &str,
) -> rusqlite::Result<i64> {
    conn.execute(
        r#"
        INSERT INTO articles (language_code, title, slug, content, summary, status, published_at,
            allow_comments, cover_image_id, author_id, reporter_id, seo_title, seo_description,
            seo_keywords, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        rusqlite::params![
            language.to_string(),
            &input.title,
            slug,
            &input.content,
            &input.summary,
            status.to_string(),
            published_at,
            input.allow_comments,
            input.cover_image_id,
            input.author_id,
            input.reporter_id,
            &input.seo_title,
            &input.seo_description,
            &input.seo_keywords,
            now,
            now,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

// Only a UNIQUE failure means "slug taken"; other constraint violations
// (e.g. a foreign key broken between validate and insert) must not trigger
// a regeneration retry.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

const ARTICLE_COLUMNS: &str = "id, language_code, title, slug, content, summary, status, \
    published_at, allow_comments, cover_image_id, author_id, reporter_id, seo_title, \
    seo_description, seo_keywords, created_at, updated_at";

fn row_to_article(row: &rusqlite::Row) -> rusqlite::Result<Article> {
    Ok(Article {
        id: row.get(0)?,
        language_code: row
            .get::<_, String>(1)?
            .parse()
            .unwrap_or(LanguageCode::En),
        title: row.get(2)?,
        slug: row.get(3)?,
        content: row.get(4)?,
        summary: row.get(5)?,
        status: row
            .get::<_, String>(6)?
            .parse()
            .unwrap_or(ArticleStatus::Draft),
        published_at: row.get(7)?,
        allow_comments: row.get(8)?,
        cover_image_id: row.get(9)?,
        author_id: row.get(10)?,
        reporter_id: row.get(11)?,
        seo_title: row.get(12)?,
        seo_description: row.get(13)?,
        seo_keywords: row.get(14)?,
        created_at: row.get(15)?,
        updated_at: row.get(16)?,
    })
}
