//! Shared test utilities for the folio test suite.
//!
//! Provides block builders for renderer tests, project documents for source
//! and generation tests, and a deterministic asset resolver.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let blocks = vec![heading(HeadingLevel::H1, "Intro"), paragraph("Hello")];
//! let assets = test_assets();
//! let html = Renderer::new(&assets, &PlainText, 800).render_to_string(&blocks);
//! ```

use crate::assets::CdnAssetResolver;
use crate::blocks::{
    CaptionedImage, CodeBlock, ContentBlock, HeadingLevel, ImageRef, ListKind, Mark, Span,
    TextBlock,
};
use crate::source::ExportSource;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

// =========================================================================
// Assets
// =========================================================================

/// Resolver producing `https://cdn.test/proj/ds/<id>-<W>x<H>.<ext>?w=<width>`.
pub fn test_assets() -> CdnAssetResolver {
    CdnAssetResolver::new("https://cdn.test", "proj", "ds")
}

// =========================================================================
// Block builders
// =========================================================================

pub fn paragraph(text: &str) -> ContentBlock {
    ContentBlock::Text(TextBlock::paragraph(vec![Span::plain(text)]))
}

pub fn heading(level: HeadingLevel, text: &str) -> ContentBlock {
    ContentBlock::Text(TextBlock::heading(level, vec![Span::plain(text)]))
}

pub fn bullet(depth: u8, text: &str) -> ContentBlock {
    ContentBlock::Text(TextBlock::list_item(
        ListKind::Bullet,
        depth,
        vec![Span::plain(text)],
    ))
}

pub fn numbered(depth: u8, text: &str) -> ContentBlock {
    ContentBlock::Text(TextBlock::list_item(
        ListKind::Number,
        depth,
        vec![Span::plain(text)],
    ))
}

pub fn image_block(reference: &str, caption: Option<&str>) -> ContentBlock {
    ContentBlock::Image(CaptionedImage {
        image: ImageRef(reference.to_string()),
        caption: caption.map(String::from),
        with_y_margin: true,
    })
}

pub fn code_block(language: Option<&str>, code: &str) -> ContentBlock {
    ContentBlock::Code(CodeBlock {
        code: code.to_string(),
        language: language.map(String::from),
    })
}

/// A document touching every block kind and mark.
pub fn sample_document() -> Vec<ContentBlock> {
    vec![
        heading(HeadingLevel::H1, "Intro"),
        ContentBlock::Text(TextBlock::paragraph(vec![
            Span::plain("Read "),
            Span::marked(
                "the docs",
                vec![
                    Mark::Link {
                        href: "https://example.com".into(),
                    },
                    Mark::Strong,
                ],
            ),
            Span::plain(" & <enjoy>."),
        ])),
        bullet(1, "one"),
        bullet(1, "two"),
        numbered(2, "nested"),
        image_block("image-abc-10x10-png", Some("A figure")),
        code_block(Some("rust"), "fn main() {\n    println!(\"hi\");\n}\n"),
        heading(HeadingLevel::H2, "Outro"),
    ]
}

// =========================================================================
// Project documents
// =========================================================================

/// Minimal valid project document with a video showcase.
pub fn project_doc(id: &str, slug: &str, started_at: &str) -> Value {
    json!({
        "_id": id,
        "_type": "project",
        "title": format!("Project {id}"),
        "slug": {"_type": "slug", "current": slug},
        "startedAt": started_at,
        "showcaseMedia": {"muxVideoPlaybackId": format!("vid-{id}")},
    })
}

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// The export under `fixtures/content/`.
pub fn fixture_export() -> ExportSource {
    ExportSource::load(&fixtures_dir().join("content/projects.ndjson")).unwrap()
}
