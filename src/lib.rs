//! # Folio
//!
//! A content-driven portfolio site builder. Projects live in a headless
//! content store; folio reads an export of it, renders each project's
//! portable-text descriptions to HTML, and writes a static site of project
//! cards and project pages.
//!
//! # Two leaf utilities
//!
//! Most of the crate is plumbing around two small, independent pieces:
//!
//! - **Content Renderer** ([`render`]): an ordered list of content blocks
//!   (text with marks, captioned images, code) becomes one HTML fragment.
//!   Escaping is unconditional, output is deterministic, and malformed
//!   content degrades instead of failing.
//! - **Hover-Preview Controller** ([`hover`]): the per-card state machine
//!   behind video showcases. A long hover authorizes autoplay, media events
//!   drive playing and muted flags, and watch progress is debounced before
//!   it reaches the card, which turns it into a resume link ([`resume`]).
//!
//! # Pipeline
//!
//! ```text
//! content/projects.ndjson ──source──▶ RawProject ──projects──▶ ProjectSummary / Project
//!                                                                  │
//!                                                       generate ──┴──▶ dist/*.html
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`blocks`] | Content block model and its tolerant JSON decoding |
//! | [`assets`] | Asset-resolution trait and the image CDN resolver |
//! | [`highlight`] | Syntax-highlighting trait and the syntect implementation |
//! | [`render`] | Content Renderer: blocks → HTML |
//! | [`debounce`] | Leading + trailing debouncer as an explicit state object |
//! | [`hover`] | Hover-Preview Controller |
//! | [`resume`] | Resume deep links and `v` query parsing |
//! | [`types`] | `ProjectSummary`, `Project`, `ShowcaseMedia` |
//! | [`source`] | Content source trait and the export-file implementation |
//! | [`projects`] | Documents → page-ready projects; page error taxonomy |
//! | [`slug`] | URL-safe slug checks and uniqueness |
//! | [`generate`] | Page templates (maud) and the static site build |
//! | [`config`] | `config.toml` loading, validation, and stock defaults |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Collaborators are passed in
//!
//! The content source, asset resolver and highlighter are traits handed to
//! [`projects::Projects`] and [`render::Renderer`] at construction. There is
//! no global client; tests swap in fixtures and [`highlight::PlainText`].
//!
//! ## Time is an argument
//!
//! Neither the debouncer nor the hover controller owns a timer. Every call
//! takes the current `Instant` and they report their next deadline, so a host
//! event loop drives them and tests replay exact timelines.
//!
//! ## Maud for all HTML
//!
//! Both the content renderer and the page templates use
//! [Maud](https://maud.lambda.xyz/). Every interpolation is escaped, so span
//! text from the content store cannot inject markup.

pub mod assets;
pub mod blocks;
pub mod config;
pub mod debounce;
pub mod generate;
pub mod highlight;
pub mod hover;
pub mod output;
pub mod projects;
pub mod render;
pub mod resume;
pub mod slug;
pub mod source;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
