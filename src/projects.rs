//! Project queries: content source documents mapped to page-ready types.
//!
//! [`Projects`] owns no data. It is handed the content source, the asset
//! resolver and the highlighter at construction and combines them: showcase
//! images become URLs at the configured width, descriptions become HTML via
//! the [`Renderer`].

use crate::assets::AssetResolver;
use crate::blocks::{CaptionedImage, captioned_image_from_value};
use crate::config::AssetsConfig;
use crate::highlight::Highlighter;
use crate::render::Renderer;
use crate::source::{ContentSource, RawProject, RawShowcase, SourceError};
use crate::types::{Project, ProjectLinks, ProjectSummary, ShowcaseMedia};
use maud::Markup;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Why a project page could not be produced.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("Project not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Upstream(#[from] SourceError),
}

impl PageError {
    /// HTTP-equivalent status for the full-page message.
    pub fn status(&self) -> u16 {
        match self {
            PageError::NotFound(_) => 404,
            PageError::Upstream(_) => 500,
        }
    }
}

#[derive(Clone, Copy)]
pub struct Projects<'a> {
    source: &'a dyn ContentSource,
    renderer: Renderer<'a>,
    assets: &'a dyn AssetResolver,
    showcase_width: u32,
    content_width: u32,
}

impl<'a> Projects<'a> {
    pub fn new(
        source: &'a dyn ContentSource,
        assets: &'a dyn AssetResolver,
        highlighter: &'a dyn Highlighter,
        widths: &AssetsConfig,
    ) -> Self {
        Self {
            source,
            renderer: Renderer::new(assets, highlighter, widths.content_width),
            assets,
            showcase_width: widths.showcase_width,
            content_width: widths.content_width,
        }
    }

    /// The renderer used for descriptions.
    pub fn renderer(&self) -> Renderer<'a> {
        self.renderer
    }

    /// All projects as cards, newest first.
    pub fn fetch_project_summaries(&self) -> Result<Vec<ProjectSummary>, SourceError> {
        self.source
            .list_projects()?
            .iter()
            .map(|raw| self.summary(raw, self.showcase_width))
            .collect()
    }

    /// One project's detail view, or `None` for an unknown slug.
    pub fn fetch_project(&self, slug: &str) -> Result<Option<Project>, SourceError> {
        self.source
            .project_by_slug(slug)?
            .map(|raw| self.project(&raw))
            .transpose()
    }

    /// Like [`fetch_project`](Self::fetch_project), with a missing slug as
    /// [`PageError::NotFound`].
    pub fn load_project_page(&self, slug: &str) -> Result<Project, PageError> {
        self.fetch_project(slug)?
            .ok_or_else(|| PageError::NotFound(slug.to_string()))
    }

    /// Map a document to its detail view.
    pub fn project(&self, raw: &RawProject) -> Result<Project, SourceError> {
        debug!(slug = raw.slug.as_str(), "rendering project descriptions");
        // The detail showcase sits flush under the header: no vertical margin.
        let summary = self.summary(raw, self.content_width)?;
        let showcase_figure = match &raw.showcase_media {
            RawShowcase::Image { image } => {
                let image = CaptionedImage {
                    with_y_margin: false,
                    ..decode_image(raw, image)?
                };
                self.renderer.captioned_image(&image).map(Markup::into_string)
            }
            RawShowcase::Video { .. } => None,
        };
        Ok(Project {
            summary,
            showcase_figure,
            links: ProjectLinks {
                github: non_empty(&raw.github_link),
                live: non_empty(&raw.live_link),
                arxiv: non_empty(&raw.arxiv_link),
            },
            short_description: self.renderer.render_to_string(&raw.short_description),
            technical_description: self.renderer.render_to_string(&raw.technical_description),
        })
    }

    fn summary(&self, raw: &RawProject, image_width: u32) -> Result<ProjectSummary, SourceError> {
        Ok(ProjectSummary {
            id: raw.id.clone(),
            title: raw.title.clone(),
            slug: raw.slug.clone(),
            started_at: raw.started_at,
            showcase: self.showcase(raw, image_width)?,
            tags: raw.tags.clone(),
        })
    }

    fn showcase(&self, raw: &RawProject, width: u32) -> Result<ShowcaseMedia, SourceError> {
        match &raw.showcase_media {
            RawShowcase::Video { playback_id } => Ok(ShowcaseMedia::Video {
                playback_id: playback_id.clone(),
            }),
            RawShowcase::Image { image } => {
                let image = decode_image(raw, image)?;
                let url = self
                    .assets
                    .image_url(&image.image, width)
                    .map_err(|source| SourceError::Asset {
                        id: raw.id.clone(),
                        source,
                    })?;
                Ok(ShowcaseMedia::Image {
                    url,
                    caption: image.caption,
                })
            }
        }
    }
}

fn decode_image(raw: &RawProject, value: &Value) -> Result<CaptionedImage, SourceError> {
    captioned_image_from_value(value.clone()).map_err(|source| SourceError::Decode {
        id: raw.id.clone(),
        source,
    })
}

fn non_empty(link: &Option<String>) -> Option<String> {
    link.as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
}
