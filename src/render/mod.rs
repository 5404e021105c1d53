//! Content Renderer: portable-text blocks → HTML.
//!
//! Converts an ordered [`ContentBlock`] sequence into one HTML fragment ready
//! to be injected into a page's content region.
//!
//! ## Output rules
//!
//! | Block | HTML |
//! |-------|------|
//! | paragraph | `<p>` |
//! | heading 1–3 | `<h1>`–`<h3>` |
//! | list run | `<ul>` / `<ol>` of `<li>`, class `depth-N` below the top level |
//! | captioned image | `<figure class="captioned-image [with-y-margin]">` with `<img>` and optional `<figcaption>` |
//! | code | `<div class="code-block-container"><pre><code class="language-…">` |
//!
//! Span text is always escaped (maud escapes every interpolation), then
//! wrapped in its marks: link outermost, then `strong`, `em`, `code`.
//!
//! ## Determinism
//!
//! Rendering is a pure function of the blocks, the resolver, and the
//! highlighter: no maps with unstable iteration order, no clocks. Rendering
//! the same document twice yields byte-identical HTML.
//!
//! ## Degradation
//!
//! Unknown blocks and unresolvable images are skipped with a warning; they
//! never stop the blocks after them from rendering.

mod lists;
mod media;
mod text;

pub use lists::{Segment, segments};
pub use text::is_safe_href;

use crate::assets::AssetResolver;
use crate::blocks::{ContentBlock, ListKind};
use crate::highlight::Highlighter;
use maud::{Markup, html};
use tracing::warn;

/// Renders content blocks with injected asset resolution and highlighting.
#[derive(Clone, Copy)]
pub struct Renderer<'a> {
    assets: &'a dyn AssetResolver,
    highlighter: &'a dyn Highlighter,
    /// Width requested from the asset resolver for image blocks.
    image_width: u32,
}

impl<'a> Renderer<'a> {
    pub fn new(
        assets: &'a dyn AssetResolver,
        highlighter: &'a dyn Highlighter,
        image_width: u32,
    ) -> Self {
        Self {
            assets,
            highlighter,
            image_width,
        }
    }

    /// The same renderer, resolving images at a different width.
    pub fn with_image_width(self, image_width: u32) -> Self {
        Self {
            image_width,
            ..self
        }
    }

    pub fn render(&self, blocks: &[ContentBlock]) -> Markup {
        html! {
            @for segment in segments(blocks) {
                (self.segment(&segment))
            }
        }
    }

    pub fn render_to_string(&self, blocks: &[ContentBlock]) -> String {
        self.render(blocks).into_string()
    }

    fn segment(&self, segment: &Segment<'_>) -> Markup {
        match segment {
            Segment::List { item, items } => {
                let depth_class = (item.depth > 1).then(|| format!("depth-{}", item.depth));
                html! {
                    @match item.kind {
                        ListKind::Bullet => ul class=[depth_class] {
                            @for li in items { li { (text::spans(&li.spans)) } }
                        },
                        ListKind::Number => ol class=[depth_class] {
                            @for li in items { li { (text::spans(&li.spans)) } }
                        },
                    }
                }
            }
            Segment::Block(block) => match block {
                ContentBlock::Text(t) => text::text_block(t),
                ContentBlock::Image(image) => self.captioned_image(image).unwrap_or_else(|| html! {}),
                ContentBlock::Code(code) => self.code_block(code),
                ContentBlock::Unknown { kind, reason } => {
                    warn!(kind = kind.as_str(), reason = reason.as_str(), "skipping content block");
                    html! {}
                }
            },
        }
    }
}
