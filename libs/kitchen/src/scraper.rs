//! Recipe scraping collaborator
//!
//! [`RecipeScraper`] is the seam the domain layer consumes. [`HttpScraper`]
//! fetches a page and reads the schema.org `Recipe` object embedded as
//! JSON-LD, which is how most recipe sites publish structured data.

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const USER_AGENT: &str = "recipe-wizard/0.1";

/// Default request timeout in seconds
pub const DEFAULT_SCRAPER_TIMEOUT: u64 = 10;

/// Scraper errors
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid recipe url: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Recipe page returned status {0}")]
    Status(u16),

    #[error("No recipe data found at {0}")]
    NoRecipe(String),
}

/// Raw fields pulled from a recipe page; any of them may be absent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapedRecipe {
    pub name: Option<String>,
    pub description: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub total_time: Option<String>,
    pub ingredient_lines: Option<Vec<String>>,
}

/// Fetches recipe data for a URL
#[async_trait]
pub trait RecipeScraper: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<ScrapedRecipe, ScrapeError>;
}

/// Scraper configuration
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Request timeout in seconds
    pub timeout: u64,
}

impl ScraperConfig {
    /// Create a new ScraperConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SCRAPER_TIMEOUT`: Request timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        let timeout = std::env::var("SCRAPER_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SCRAPER_TIMEOUT);

        ScraperConfig { timeout }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        ScraperConfig {
            timeout: DEFAULT_SCRAPER_TIMEOUT,
        }
    }
}

/// JSON-LD scraper over HTTP
#[derive(Clone)]
pub struct HttpScraper {
    http_client: reqwest::Client,
}

impl HttpScraper {
    pub fn new(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| ScrapeError::Network(e.to_string()))?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl RecipeScraper for HttpScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapedRecipe, ScrapeError> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ScrapeError::InvalidUrl(url.to_string()));
        }

        debug!(url = %url, "Fetching recipe page");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status(status.as_u16()));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ScrapeError::Network(e.to_string()))?;

        let recipe = extract_recipe(&html).ok_or_else(|| ScrapeError::NoRecipe(url.to_string()))?;

        info!(
            url = %url,
            ingredients = recipe.ingredient_lines.as_ref().map_or(0, Vec::len),
            "Scraped recipe page"
        );

        Ok(recipe)
    }
}

fn json_ld_regex() -> &'static Regex {
    static JSON_LD_REGEX: OnceLock<Regex> = OnceLock::new();
    JSON_LD_REGEX.get_or_init(|| {
        Regex::new(
            r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#,
        )
        .expect("Failed to compile JSON-LD regex")
    })
}

/// Find the first schema.org Recipe among the page's JSON-LD blocks
pub fn extract_recipe(html: &str) -> Option<ScrapedRecipe> {
    json_ld_regex()
        .captures_iter(html)
        .filter_map(|capture| serde_json::from_str::<Value>(capture[1].trim()).ok())
        .find_map(|value| find_recipe_node(&value).map(recipe_from_node))
}

fn is_recipe_type(node: &Value) -> bool {
    match node.get("@type") {
        Some(Value::String(t)) => t == "Recipe",
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("Recipe")),
        _ => false,
    }
}

fn find_recipe_node(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(nodes) => nodes.iter().find_map(find_recipe_node),
        Value::Object(map) => {
            if is_recipe_type(value) {
                return Some(value);
            }
            map.get("@graph").and_then(find_recipe_node)
        }
        _ => None,
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn text_field(node: &Value, key: &str) -> Option<String> {
    node.get(key)
        .and_then(Value::as_str)
        .map(|s| decode_entities(s.trim()))
        .filter(|s| !s.is_empty())
}

fn recipe_from_node(node: &Value) -> ScrapedRecipe {
    let ingredient_lines = node
        .get("recipeIngredient")
        .or_else(|| node.get("ingredients"))
        .and_then(Value::as_array)
        .map(|lines| {
            lines
                .iter()
                .filter_map(Value::as_str)
                .map(|line| decode_entities(line.trim()))
                .collect()
        });

    ScrapedRecipe {
        name: text_field(node, "name"),
        description: text_field(node, "description"),
        prep_time: text_field(node, "prepTime"),
        cook_time: text_field(node, "cookTime"),
        total_time: text_field(node, "totalTime"),
        ingredient_lines,
    }
}
