use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    #[default]
    En,
    Np,
}

impl FromStr for LanguageCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Self::En),
            "np" => Ok(Self::Np),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::En => write!(f, "en"),
            Self::Np => write!(f, "np"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
}

impl FromStr for ArticleStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Published => write!(f, "published"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub id: i64,
    pub language_code: LanguageCode,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub summary: Option<String>,
    pub status: ArticleStatus,
    pub published_at: Option<String>,
    pub allow_comments: bool,
    pub cover_image_id: Option<i64>,
    pub author_id: i64,
    pub reporter_id: Option<i64>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_keywords: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// What the admin tier sends when creating or replacing an article.
///
/// `language_code` and `status` arrive as raw strings so the validator can
/// report bad values instead of failing at deserialization.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ArticleSubmission {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub language_code: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub author_id: i64,
    pub reporter_id: Option<i64>,
    pub cover_image_id: Option<i64>,
    pub slug: Option<String>,
    #[serde(default)]
    pub content: String,
    pub summary: Option<String>,
    pub published_at: Option<String>,
    #[serde(default)]
    pub allow_comments: bool,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_keywords: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleSummary {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub language_code: LanguageCode,
    pub status: ArticleStatus,
    pub published_at: Option<String>,
    pub created_at: String,
}
