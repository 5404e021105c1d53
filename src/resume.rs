//! Resume deep links.
//!
//! Once a card's video has been watched past a threshold, the link to the
//! project detail page carries the progress as a `v` query parameter so the
//! detail page can resume playback near that offset.

use thiserror::Error;

/// Query parameter carrying the start offset in seconds.
pub const START_PARAM: &str = "v";

#[derive(Error, Debug, PartialEq)]
pub enum ResumeError {
    #[error("invalid start time {0:?}: expected a non-negative number of seconds")]
    InvalidStartTime(String),
}

/// The query string (without `?`) for a given watch progress.
///
/// `None` until `progress` is strictly past `threshold`. Progress is reported
/// in whole seconds.
pub fn resume_query(progress: f64, threshold: f64) -> Option<String> {
    if !progress.is_finite() || progress <= threshold {
        return None;
    }
    let seconds = progress.floor() as u64;
    Some(
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair(START_PARAM, &seconds.to_string())
            .finish(),
    )
}

/// Link to a project's detail page, with a resume query when due.
pub fn resume_link(base_path: &str, slug: &str, progress: f64, threshold: f64) -> String {
    let path = project_path(base_path, slug);
    match resume_query(progress, threshold) {
        Some(query) => format!("{path}?{query}"),
        None => path,
    }
}

/// `<base_path>/<slug>` with exactly one separating slash.
pub fn project_path(base_path: &str, slug: &str) -> String {
    format!("{}/{}", base_path.trim_end_matches('/'), slug)
}

/// Read the start offset from a query string (leading `?` optional).
///
/// Absent or empty `v` means no start offset.
pub fn parse_start_time(query: &str) -> Result<Option<f64>, ResumeError> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let Some(raw) = url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == START_PARAM)
        .map(|(_, value)| value.into_owned())
    else {
        return Ok(None);
    };
    parse_seconds(&raw)
}

/// Parse a bare start-offset value, as given to `--start`.
pub fn parse_seconds(raw: &str) -> Result<Option<f64>, ResumeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(Some(seconds)),
        _ => Err(ResumeError::InvalidStartTime(raw.to_string())),
    }
}
