//! Content source: the read-only query boundary over project documents.
//!
//! The [`ContentSource`] trait exposes the two query shapes pages need: the
//! full project list ordered by start date (newest first) and a single
//! project by slug. [`ExportSource`] implements it over a local export of the
//! content store, either a JSON array or newline-delimited JSON, one document
//! per line:
//!
//! ```json
//! {"_id": "p1", "_type": "project", "title": "Lidar Mapper",
//!  "slug": {"_type": "slug", "current": "lidar-mapper"},
//!  "startedAt": "2021-03-05T00:00:00Z",
//!  "showcaseMedia": {"muxVideoPlaybackId": "Xy12"},
//!  "tags": ["robotics"], "githubLink": "https://github.com/me/lidar",
//!  "shortDescription": [...], "technicalDescription": [...]}
//! ```
//!
//! Documents of any other `_type` are ignored. A project document that does
//! not decode is an upstream failure, not something to paper over.

use crate::assets::AssetError;
use crate::blocks::{ContentBlock, null_as_empty};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to read content export {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("content export line {line}: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },
    #[error("project document {id}: {source}")]
    Decode {
        id: String,
        source: serde_json::Error,
    },
    #[error("project document {id}: showcase image: {source}")]
    Asset { id: String, source: AssetError },
}

/// Read-only query interface over project documents.
pub trait ContentSource: Send + Sync {
    /// Every project, ordered by start date, newest first.
    fn list_projects(&self) -> Result<Vec<RawProject>, SourceError>;

    /// The project with this slug, if any.
    fn project_by_slug(&self, slug: &str) -> Result<Option<RawProject>, SourceError>;
}

/// A project document as stored, before URL resolution and rendering.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProject {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(deserialize_with = "slug_current")]
    pub slug: String,
    #[serde(deserialize_with = "start_date")]
    pub started_at: NaiveDate,
    pub showcase_media: RawShowcase,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub github_link: Option<String>,
    #[serde(default)]
    pub live_link: Option<String>,
    #[serde(default)]
    pub arxiv_link: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub short_description: Vec<ContentBlock>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub technical_description: Vec<ContentBlock>,
}

/// Showcase media as stored: a captioned image or a video playback id.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawShowcase {
    Video {
        #[serde(rename = "muxVideoPlaybackId")]
        playback_id: String,
    },
    /// The captioned image object, decoded during mapping.
    Image { image: Value },
}

/// Slugs are stored as `{"current": "..."}`; plain strings are accepted too.
fn slug_current<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Slug {
        Object { current: String },
        Plain(String),
    }
    Ok(match Slug::deserialize(deserializer)? {
        Slug::Object { current } | Slug::Plain(current) => current,
    })
}

/// `startedAt` is an RFC 3339 datetime or a bare `YYYY-MM-DD` date.
fn start_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_start_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid startedAt `{raw}`")))
}

pub fn parse_start_date(raw: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

/// A content source backed by an export file loaded into memory.
#[derive(Debug, Clone, Default)]
pub struct ExportSource {
    /// Ordered newest first.
    projects: Vec<RawProject>,
}

impl ExportSource {
    /// Load an export file: a JSON array of documents or NDJSON.
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let content = fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let documents = parse_export(&content)?;
        debug!(path = %path.display(), documents = documents.len(), "loaded content export");
        Self::from_documents(documents)
    }

    /// Build from already-parsed documents, keeping only projects.
    pub fn from_documents(documents: Vec<Value>) -> Result<Self, SourceError> {
        let mut projects = documents
            .into_iter()
            .filter(|doc| doc.get("_type").and_then(Value::as_str) == Some("project"))
            .map(|doc| {
                let id = doc
                    .get("_id")
                    .and_then(Value::as_str)
                    .unwrap_or("<no id>")
                    .to_string();
                serde_json::from_value::<RawProject>(doc)
                    .map_err(|source| SourceError::Decode { id, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        // Stable: projects started the same day keep export order.
        projects.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(Self { projects })
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl ContentSource for ExportSource {
    fn list_projects(&self) -> Result<Vec<RawProject>, SourceError> {
        Ok(self.projects.clone())
    }

    fn project_by_slug(&self, slug: &str) -> Result<Option<RawProject>, SourceError> {
        Ok(self.projects.iter().find(|p| p.slug == slug).cloned())
    }
}

/// Split an export into documents. A leading `[` means one JSON array;
/// anything else is NDJSON with blank lines ignored.
fn parse_export(content: &str) -> Result<Vec<Value>, SourceError> {
    if content.trim_start().starts_with('[') {
        return serde_json::from_str(content).map_err(|source| SourceError::Parse { line: 1, source });
    }
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|source| SourceError::Parse { line: i + 1, source })
        })
        .collect()
}
