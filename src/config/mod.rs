use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub site: SiteConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub content: ContentConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    pub title: String,
    pub url: String,
    #[serde(default = "default_language")]
    pub default_language: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentConfig {
    #[serde(default = "default_articles_per_page")]
    pub articles_per_page: usize,
    #[serde(default = "default_true")]
    pub allow_comments: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            articles_per_page: default_articles_per_page(),
            allow_comments: default_true(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_pool_size() -> u32 {
    10
}

fn default_articles_per_page() -> usize {
    20
}

fn default_true() -> bool {
    true
}
