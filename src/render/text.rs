//! Text blocks, spans, and inline marks.

use crate::blocks::{BlockStyle, HeadingLevel, Mark, Span, TextBlock};
use maud::{Markup, html};
use tracing::warn;

/// Render a non-list text block as its block element.
pub fn text_block(block: &TextBlock) -> Markup {
    let content = spans(&block.spans);
    html! {
        @match block.style {
            BlockStyle::Paragraph => p { (content) },
            BlockStyle::Heading(HeadingLevel::H1) => h1 { (content) },
            BlockStyle::Heading(HeadingLevel::H2) => h2 { (content) },
            BlockStyle::Heading(HeadingLevel::H3) => h3 { (content) },
        }
    }
}

/// Render a run of spans inline.
pub fn spans(spans: &[Span]) -> Markup {
    html! {
        @for s in spans {
            (span(s))
        }
    }
}

/// Render one span: escaped text wrapped in its marks, outermost first.
pub fn span(span: &Span) -> Markup {
    let mut inner = text_with_breaks(&span.text);
    for mark in span.marks.iter().rev() {
        inner = match mark {
            Mark::Code => html! { code { (inner) } },
            Mark::Em => html! { em { (inner) } },
            Mark::Strong => html! { strong { (inner) } },
            Mark::Link { href } => match safe_href(href) {
                Some(LinkTarget::External) => html! {
                    a href=(href) target="_blank" rel="noopener noreferrer" { (inner) }
                },
                Some(LinkTarget::Internal) => html! { a href=(href) { (inner) } },
                None => {
                    warn!(href = href.as_str(), "dropping link with unsupported scheme");
                    inner
                }
            },
        };
    }
    inner
}

fn text_with_breaks(text: &str) -> Markup {
    html! {
        @for (i, line) in text.split('\n').enumerate() {
            @if i > 0 { br; }
            (line)
        }
    }
}

/// Whether a link target may be rendered as an `href`.
pub fn is_safe_href(href: &str) -> bool {
    safe_href(href).is_some()
}

#[derive(Debug, PartialEq, Eq)]
enum LinkTarget {
    External,
    Internal,
}

/// Classify a link target; `None` for schemes that must not be rendered.
fn safe_href(href: &str) -> Option<LinkTarget> {
    let href = href.trim();
    let lower = href.to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") {
        Some(LinkTarget::External)
    } else if lower.starts_with("mailto:")
        || (href.starts_with('/') && !href.starts_with("//"))
        || href.starts_with('#')
    {
        Some(LinkTarget::Internal)
    } else {
        None
    }
}
