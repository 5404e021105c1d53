//! HTML page generation and the static site build.
//!
//! Takes mapped projects from [`Projects`] and renders full pages with maud.
//!
//! ## Generated Pages
//!
//! - **Index page** (`/index.html`): project cards, newest first
//! - **Project pages** (`<base_path>/<slug>/index.html`): showcase, links,
//!   tags, short description, collapsible technical description
//! - **Not-found page** (`/404.html`): "Project not found"
//! - **Error page**: rendered on demand for upstream failures
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── 404.html
//! └── projects/
//!     ├── lidar-mapper/
//!     │   └── index.html
//!     └── garden/
//!         └── index.html
//! ```
//!
//! ## Cards and the hover preview
//!
//! Video cards are rendered in the controller's mount state
//! ([`HoverState::default`]): badge reads "Video", the mute toggle is hidden
//! and titled "Unmute", and the link has no resume query. The `[preview]`
//! timings are written as data attributes on the thumbnail; folio ships no
//! script that reads them.
//!
//! ## CSS
//!
//! `static/style.css` is embedded at compile time. When highlighting is
//! enabled the syntect theme stylesheet is appended.

use crate::config::SiteConfig;
use crate::highlight::SyntectHighlighter;
use crate::hover::HoverState;
use crate::projects::{PageError, Projects};
use crate::render::is_safe_href;
use crate::resume::project_path;
use crate::slug::{SlugIssue, validate_slugs};
use crate::source::SourceError;
use crate::types::{Project, ProjectSummary, ShowcaseMedia};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Page(#[from] PageError),
    #[error("invalid project slugs: {}", format_issues(.0))]
    Slugs(Vec<SlugIssue>),
}

fn format_issues(issues: &[SlugIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

const CSS_STATIC: &str = include_str!("../static/style.css");

const VIDEO_STREAM_BASE: &str = "https://stream.mux.com";
const VIDEO_THUMBNAIL_BASE: &str = "https://image.mux.com";

/// Full stylesheet: base styles plus the highlight theme when enabled.
pub fn site_css(config: &SiteConfig, highlighter: Option<&SyntectHighlighter>) -> String {
    match highlighter {
        Some(h) if config.code.highlight => {
            format!("{}\n\n{}", CSS_STATIC, h.stylesheet(&config.code.theme))
        }
        _ => CSS_STATIC.to_string(),
    }
}

/// Site-wide values every page needs.
#[derive(Debug, Clone, Copy)]
pub struct Site<'a> {
    pub config: &'a SiteConfig,
    pub css: &'a str,
}

impl<'a> Site<'a> {
    pub fn new(config: &'a SiteConfig, css: &'a str) -> Self {
        Self { config, css }
    }

    fn index_href(&self) -> &'static str {
        "/"
    }
}

// ============================================================================
// Page layout
// ============================================================================

fn base_document(site: &Site<'_>, title: &str, body_class: &str, content: Markup) -> Markup {
    let page_title = if title == site.config.site.title {
        title.to_string()
    } else {
        format!("{} | {}", title, site.config.site.title)
    };
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (page_title) }
                style { (PreEscaped(site.css)) }
            }
            body class=(body_class) {
                header.site-header {
                    a.site-title href=(site.index_href()) { (site.config.site.title) }
                }
                (content)
            }
        }
    }
}

fn tag_list(tags: &[String]) -> Markup {
    html! {
        @if !tags.is_empty() {
            ul.tags {
                @for tag in tags {
                    li.tag { "#" (tag) }
                }
            }
        }
    }
}

fn video_stream_url(playback_id: &str) -> String {
    format!("{VIDEO_STREAM_BASE}/{playback_id}.m3u8")
}

fn video_thumbnail_url(playback_id: &str) -> String {
    format!("{VIDEO_THUMBNAIL_BASE}/{playback_id}/thumbnail.jpg")
}

// ============================================================================
// Index
// ============================================================================

pub fn render_index(summaries: &[ProjectSummary], site: &Site<'_>) -> Markup {
    let content = html! {
        main.index-page {
            h1 { (site.config.site.title) }
            div.project-grid {
                @for summary in summaries {
                    (project_card(summary, site))
                }
            }
        }
    };
    base_document(site, &site.config.site.title, "index", content)
}

/// One card: a link to the project page wrapping showcase and details.
pub fn project_card(summary: &ProjectSummary, site: &Site<'_>) -> Markup {
    let state = HoverState::default();
    let preview = &site.config.preview;
    let href = project_path(&site.config.site.base_path, &summary.slug);

    html! {
        a.project-card href=(href) {
            div.showcase {
                @match &summary.showcase {
                    ShowcaseMedia::Image { url, .. } => {
                        img src=(url) alt=(summary.title) loading="lazy";
                    }
                    ShowcaseMedia::Video { playback_id } => {
                        div.video-thumbnail
                            data-playback-id=(playback_id)
                            data-long-hover-ms=(preview.long_hover_ms)
                            data-progress-debounce-ms=(preview.progress_debounce_ms)
                            data-resume-threshold=(preview.resume_threshold_secs.to_string())
                        {
                            div.overlay {
                                button.mute-toggle.hidden[!state.show_mute_toggle()]
                                    type="button"
                                    title=(state.mute_toggle_title()) {}
                                span.badge.hidden[!state.show_badge()] { (state.badge_label()) }
                            }
                            video
                                src=(video_stream_url(playback_id))
                                poster=(video_thumbnail_url(playback_id))
                                title=(summary.title)
                                muted
                                playsinline
                                preload="none" {}
                        }
                    }
                }
            }
            div.card-body {
                time.date datetime=(summary.started_at.to_string()) { (summary.display_date()) }
                div.title { (summary.title) }
                (tag_list(&summary.tags))
            }
        }
    }
}

// ============================================================================
// Project detail
// ============================================================================

/// Render a project page. `start_time` comes from the `v` query parameter
/// and only affects video showcases.
pub fn render_project_page(project: &Project, start_time: Option<f64>, site: &Site<'_>) -> Markup {
    let summary = &project.summary;
    let content = html! {
        article.project-page {
            header {
                h1.title { (summary.title) }
                time.date datetime=(summary.started_at.to_string()) { (summary.display_date()) }
                div.showcase {
                    @match &summary.showcase {
                        ShowcaseMedia::Image { .. } => {
                            @if let Some(figure) = &project.showcase_figure {
                                (PreEscaped(figure))
                            }
                        }
                        ShowcaseMedia::Video { playback_id } => {
                            video.video-player
                                src=(video_stream_url(playback_id))
                                poster=(video_thumbnail_url(playback_id))
                                title=(summary.title)
                                data-playback-id=(playback_id)
                                data-start-time=[start_time.map(|s| s.to_string())]
                                controls
                                playsinline {}
                        }
                    }
                }
                (project_links(project))
                (tag_list(&summary.tags))
            }
            main.content {
                div.short-description { (PreEscaped(&project.short_description)) }
                @if !project.technical_description.is_empty() {
                    details.technical-desc {
                        summary { "Technical Description" }
                        div { (PreEscaped(&project.technical_description)) }
                    }
                }
            }
        }
    };
    base_document(site, &summary.title, "project", content)
}

fn project_links(project: &Project) -> Markup {
    let links: Vec<(&str, &str)> = project
        .links
        .labeled()
        .into_iter()
        .filter(|(label, href)| {
            let safe = is_safe_href(href);
            if !safe {
                warn!(slug = project.summary.slug.as_str(), label, "dropping unsafe project link");
            }
            safe
        })
        .collect();
    html! {
        @if !links.is_empty() {
            div.project-links {
                @for (label, href) in links {
                    a.project-link href=(href) target="_blank" rel="noopener noreferrer" { (label) }
                }
            }
        }
    }
}

// ============================================================================
// Full-page messages
// ============================================================================

pub fn render_not_found(site: &Site<'_>) -> Markup {
    let content = html! {
        main.message-page {
            h1 { "Project not found" }
            p { a href=(site.index_href()) { "Back to all projects" } }
        }
    };
    base_document(site, "Project not found", "not-found", content)
}

pub fn render_error_page(error: &dyn std::error::Error, site: &Site<'_>) -> Markup {
    let content = html! {
        main.message-page {
            h1 { "Something went wrong" }
            p.error-message { (error.to_string()) }
            p { a href=(site.index_href()) { "Back to all projects" } }
        }
    };
    base_document(site, "Error", "error", content)
}

/// Turn a page load into its status and full page.
pub fn render_page_result(
    result: &Result<Project, PageError>,
    start_time: Option<f64>,
    site: &Site<'_>,
) -> (u16, Markup) {
    match result {
        Ok(project) => (200, render_project_page(project, start_time, site)),
        Err(err @ PageError::NotFound(_)) => (err.status(), render_not_found(site)),
        Err(err) => (err.status(), render_error_page(err, site)),
    }
}

// ============================================================================
// Build
// ============================================================================

/// One written project page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageEntry {
    pub title: String,
    pub slug: String,
    /// Path relative to the output directory.
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub index: PathBuf,
    pub pages: Vec<PageEntry>,
    pub not_found: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub projects: usize,
    pub issues: Vec<SlugIssue>,
}

/// Relative output path of a project page.
pub fn page_path(base_path: &str, slug: &str) -> PathBuf {
    let mut path: PathBuf = base_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();
    path.push(slug);
    path.push("index.html");
    path
}

/// Fetch and render every project, write the site into `output_dir`.
///
/// Slugs are validated before anything is written; a bad or duplicate slug
/// fails the build.
pub fn build(
    projects: &Projects<'_>,
    site: &Site<'_>,
    output_dir: &Path,
) -> Result<BuildReport, GenerateError> {
    let summaries = projects.fetch_project_summaries()?;
    let issues = validate_slugs(summaries.iter().map(|s| (s.id.as_str(), s.slug.as_str())));
    if !issues.is_empty() {
        return Err(GenerateError::Slugs(issues));
    }

    fs::create_dir_all(output_dir)?;

    let index = PathBuf::from("index.html");
    fs::write(output_dir.join(&index), render_index(&summaries, site).into_string())?;
    debug!(projects = summaries.len(), "wrote index page");

    let base_path = &site.config.site.base_path;
    let pages = summaries
        .par_iter()
        .map(|summary| -> Result<PageEntry, GenerateError> {
            let project = projects.load_project_page(&summary.slug)?;
            let path = page_path(base_path, &summary.slug);
            let target = output_dir.join(&path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, render_project_page(&project, None, site).into_string())?;
            debug!(slug = summary.slug.as_str(), url = %project_path(base_path, &summary.slug), "wrote project page");
            Ok(PageEntry {
                title: project.summary.title,
                slug: summary.slug.clone(),
                path,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let not_found = PathBuf::from("404.html");
    fs::write(output_dir.join(&not_found), render_not_found(site).into_string())?;

    info!(pages = pages.len(), output = %output_dir.display(), "site built");
    Ok(BuildReport {
        index,
        pages,
        not_found,
    })
}

/// Fetch and render everything without writing, collecting slug issues.
pub fn check(projects: &Projects<'_>, site: &Site<'_>) -> Result<CheckReport, GenerateError> {
    let summaries = projects.fetch_project_summaries()?;
    let issues = validate_slugs(summaries.iter().map(|s| (s.id.as_str(), s.slug.as_str())));
    let _ = render_index(&summaries, site);
    summaries
        .par_iter()
        .map(|summary| -> Result<(), GenerateError> {
            let project = projects.load_project_page(&summary.slug)?;
            let _ = render_project_page(&project, None, site);
            Ok(())
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CheckReport {
        projects: summaries.len(),
        issues,
    })
}
