//! Project types shared by the content source mapping and page generation.
//!
//! These are the processed shapes: dates parsed, showcase images resolved to
//! URLs, descriptions rendered to HTML. They are never mutated after mapping.

use chrono::NaiveDate;

/// Display format for project start dates, e.g. `05 Mar 2021`.
pub const DATE_FORMAT: &str = "%d %b %Y";

/// The primary image or video representing a project.
#[derive(Debug, Clone, PartialEq)]
pub enum ShowcaseMedia {
    Image {
        url: String,
        caption: Option<String>,
    },
    Video {
        playback_id: String,
    },
}

impl ShowcaseMedia {
    pub fn is_video(&self) -> bool {
        matches!(self, ShowcaseMedia::Video { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSummary {
    pub id: String,
    pub title: String,
    /// Unique, URL-safe identifier used in page paths.
    pub slug: String,
    pub started_at: NaiveDate,
    pub showcase: ShowcaseMedia,
    pub tags: Vec<String>,
}

impl ProjectSummary {
    pub fn display_date(&self) -> String {
        self.started_at.format(DATE_FORMAT).to_string()
    }
}

/// External links shown on a project page. Any may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectLinks {
    pub github: Option<String>,
    pub live: Option<String>,
    pub arxiv: Option<String>,
}

impl ProjectLinks {
    /// `(label, href)` pairs in display order, skipping absent links.
    pub fn labeled(&self) -> Vec<(&'static str, &str)> {
        [
            ("GitHub Repo", self.github.as_deref()),
            ("Live Project", self.live.as_deref()),
            ("Arxiv", self.arxiv.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, href)| href.map(|h| (label, h)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.github.is_none() && self.live.is_none() && self.arxiv.is_none()
    }
}

/// A project's detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub summary: ProjectSummary,
    pub links: ProjectLinks,
    /// Rendered figure for an image showcase; `None` for video.
    pub showcase_figure: Option<String>,
    /// Rendered HTML.
    pub short_description: String,
    /// Rendered HTML; empty when the project has none.
    pub technical_description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_date_uses_day_month_year() {
        let summary = ProjectSummary {
            id: "p1".into(),
            title: "T".into(),
            slug: "t".into(),
            started_at: NaiveDate::from_ymd_opt(2021, 3, 5).unwrap(),
            showcase: ShowcaseMedia::Video {
                playback_id: "abc".into(),
            },
            tags: vec![],
        };
        assert_eq!(summary.display_date(), "05 Mar 2021");
    }

    #[test]
    fn links_keep_display_order_and_skip_missing() {
        let links = ProjectLinks {
            github: Some("https://github.com/x/y".into()),
            live: None,
            arxiv: Some("https://arxiv.org/abs/1".into()),
        };
        assert_eq!(
            links.labeled(),
            vec![
                ("GitHub Repo", "https://github.com/x/y"),
                ("Arxiv", "https://arxiv.org/abs/1"),
            ]
        );
        assert!(!links.is_empty());
        assert!(ProjectLinks::default().is_empty());
    }
}
