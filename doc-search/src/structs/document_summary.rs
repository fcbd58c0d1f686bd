//! Flat document record projected from a raw search hit.
//!
//! Every field is non-optional: a missing or null source field is replaced
//! by its placeholder once, during projection.

use serde::Serialize;
use serde_json::{Map, Value};

use super::search_hit::SearchHit;

pub const NO_TITLE: &str = "No title provided";
pub const NO_ABSTRACT: &str = "No abstract available";
pub const NO_AUTHORS: &str = "No authors listed";
pub const NO_CLASSIFICATION: &str = "No classification provided";
pub const NO_CONCEPTS: &str = "No concepts listed";
pub const NO_YEAR: &str = "No year listed";
pub const NO_DOWNLOAD_URL: &str = "No download URL provided";
pub const NO_EMOTION: &str = "No emotion provided";
pub const NO_SENTIMENT: &str = "No sentiment provided";
pub const NO_CATEGORIES: &str = "No categories listed";
pub const NO_ID: &str = "No ID provided";

/// Summary of one annotated document, ready for prompt assembly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub authors: Vec<String>,
    pub classification: String,
    pub concepts: Vec<String>,
    pub year_published: String,
    pub download_url: String,
    pub emotion: String,
    pub sentiment: String,
    pub categories: Vec<String>,
    #[serde(rename = "_id")]
    pub id: String,
}

impl DocumentSummary {
    /// Projects a hit into a summary, substituting placeholders for absent fields.
    ///
    /// The id is taken from `_source._id`, then from the hit's own `_id`.
    pub fn from_hit(hit: &SearchHit) -> Self {
        let empty = Map::new();
        let src = hit.source.as_object().unwrap_or(&empty);

        let id = scalar(src, "_id")
            .or_else(|| hit.id.clone().filter(|s| !s.is_empty()))
            .unwrap_or_else(|| NO_ID.to_string());

        Self {
            title: scalar_or(src, "title", NO_TITLE),
            abstract_text: scalar_or(src, "abstract", NO_ABSTRACT),
            authors: list_or(src, "authors", NO_AUTHORS),
            classification: scalar_or(src, "classification", NO_CLASSIFICATION),
            concepts: list_or(src, "concepts", NO_CONCEPTS),
            year_published: scalar_or(src, "yearPublished", NO_YEAR),
            download_url: scalar_or(src, "downloadUrl", NO_DOWNLOAD_URL),
            emotion: scalar_or(src, "emotion", NO_EMOTION),
            sentiment: scalar_or(src, "sentiment", NO_SENTIMENT),
            categories: list_or(src, "categories", NO_CATEGORIES),
            id,
        }
    }
}

/// Renders a JSON value as display text. Strings are unquoted.
fn render(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn scalar(src: &Map<String, Value>, key: &str) -> Option<String> {
    src.get(key).and_then(render)
}

fn scalar_or(src: &Map<String, Value>, key: &str, fallback: &str) -> String {
    scalar(src, key).unwrap_or_else(|| fallback.to_string())
}

fn list_or(src: &Map<String, Value>, key: &str, fallback: &str) -> Vec<String> {
    match src.get(key) {
        None | Some(Value::Null) => vec![fallback.to_string()],
        Some(Value::Array(items)) => items.iter().filter_map(render).collect(),
        Some(other) => render(other).into_iter().collect(),
    }
}
