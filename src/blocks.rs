//! Content Block model: the portable, block-structured rich-text document.
//!
//! A document is an ordered `Vec<ContentBlock>`; order is render order. Blocks
//! arrive from the content source as JSON objects discriminated by `_type`:
//!
//! ```json
//! [
//!   { "_type": "block", "style": "h1", "children": [{ "_type": "span", "text": "Intro" }] },
//!   { "_type": "block", "listItem": "bullet", "level": 2,
//!     "markDefs": [{ "_key": "k1", "_type": "link", "href": "https://example.com" }],
//!     "children": [{ "_type": "span", "text": "docs", "marks": ["k1", "strong"] }] },
//!   { "_type": "captionedImage", "asset": { "_ref": "image-abc-800x600-png" }, "caption": "Figure 1" },
//!   { "_type": "code", "language": "rust", "code": "fn main() {}" }
//! ]
//! ```
//!
//! ## Tolerant decoding
//!
//! Decoding a [`ContentBlock`] never fails on content shape. A block whose
//! `_type` is unknown, or whose fields do not decode, becomes
//! [`ContentBlock::Unknown`] carrying the reason; the renderer skips it and
//! logs. Inside text blocks, unknown styles degrade to paragraphs, unknown
//! list kinds degrade to plain blocks, and unknown marks are dropped so the
//! text renders unwrapped. The same goes for a malformed mark definition or
//! a `null` list field: the entry is skipped, never the block.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// One structural unit of a rich-text document.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(TextBlock),
    Image(CaptionedImage),
    Code(CodeBlock),
    /// A block that could not be understood. Never rendered.
    Unknown { kind: String, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub style: BlockStyle,
    /// Set when the block is a list item.
    pub list: Option<ListItem>,
    pub spans: Vec<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    Paragraph,
    Heading(HeadingLevel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListItem {
    pub kind: ListKind,
    /// Nesting depth, starting at 1.
    pub depth: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Number,
}

/// A run of text sharing one set of marks.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    /// Sorted outermost first, at most one mark of each kind.
    pub marks: Vec<Mark>,
}

/// Inline decoration. Variant order is wrapping order: the first variant
/// wraps outermost.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Mark {
    Link { href: String },
    Strong,
    Em,
    Code,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptionedImage {
    pub image: ImageRef,
    pub caption: Option<String>,
    /// Wrap the figure with vertical margin. Layout only, never affects the URL.
    pub with_y_margin: bool,
}

/// Opaque asset reference, resolved to a URL by an
/// [`AssetResolver`](crate::assets::AssetResolver).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef(pub String);

#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub code: String,
    pub language: Option<String>,
}

// ============================================================================
// Constructors
// ============================================================================

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// Build a span, normalizing marks into wrapping order.
    pub fn marked(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        Self {
            text: text.into(),
            marks: normalize_marks(marks),
        }
    }
}

impl TextBlock {
    pub fn paragraph(spans: Vec<Span>) -> Self {
        Self {
            style: BlockStyle::Paragraph,
            list: None,
            spans,
        }
    }

    pub fn heading(level: HeadingLevel, spans: Vec<Span>) -> Self {
        Self {
            style: BlockStyle::Heading(level),
            list: None,
            spans,
        }
    }

    pub fn list_item(kind: ListKind, depth: u8, spans: Vec<Span>) -> Self {
        Self {
            style: BlockStyle::Paragraph,
            list: Some(ListItem {
                kind,
                depth: depth.max(1),
            }),
            spans,
        }
    }

    /// Concatenated span text, marks ignored.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

fn normalize_marks(mut marks: Vec<Mark>) -> Vec<Mark> {
    marks.sort();
    marks.dedup_by(|a, b| std::mem::discriminant(a) == std::mem::discriminant(b));
    marks
}

// ============================================================================
// Decoding
// ============================================================================

/// Parse a JSON array of blocks.
///
/// Fails only when the input is not a JSON array; individual malformed blocks
/// decode to [`ContentBlock::Unknown`].
pub fn parse_document(json: &str) -> Result<Vec<ContentBlock>, serde_json::Error> {
    serde_json::from_str(json)
}

impl<'de> Deserialize<'de> for ContentBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(ContentBlock::from_value(value))
    }
}

#[derive(Deserialize)]
struct RawTextBlock {
    #[serde(default)]
    style: Option<String>,
    #[serde(default, rename = "listItem")]
    list_item: Option<String>,
    #[serde(default)]
    level: Option<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    children: Vec<RawSpan>,
    // Entries are checked one at a time so a bad one only loses its mark.
    #[serde(default, rename = "markDefs", deserialize_with = "null_as_empty")]
    mark_defs: Vec<Value>,
}

#[derive(Deserialize)]
struct RawSpan {
    #[serde(default, rename = "_type")]
    kind: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    marks: Vec<Value>,
}

struct MarkDef {
    key: String,
    kind: String,
    href: Option<String>,
}

impl MarkDef {
    fn from_value(value: &Value) -> Option<Self> {
        let key = value.get("_key").and_then(Value::as_str);
        let kind = value.get("_type").and_then(Value::as_str);
        match (key, kind) {
            (Some(key), Some(kind)) => Some(Self {
                key: key.to_string(),
                kind: kind.to_string(),
                href: value.get("href").and_then(Value::as_str).map(String::from),
            }),
            _ => {
                warn!(def = %value, "mark definition without _key or _type, ignoring");
                None
            }
        }
    }
}

/// Decode a list field where `null` means empty.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
struct RawImage {
    asset: RawAsset,
    #[serde(default)]
    caption: Option<String>,
}

#[derive(Deserialize)]
struct RawAsset {
    #[serde(rename = "_ref")]
    reference: String,
}

#[derive(Deserialize)]
struct RawCode {
    #[serde(default)]
    code: String,
    #[serde(default)]
    language: Option<String>,
}

impl ContentBlock {
    /// Decode one block from its JSON value. Never fails.
    pub fn from_value(value: Value) -> Self {
        let kind = match value.get("_type").and_then(Value::as_str) {
            Some(kind) => kind.to_string(),
            None => {
                return ContentBlock::Unknown {
                    kind: "<missing>".to_string(),
                    reason: "block has no _type".to_string(),
                };
            }
        };

        let decoded = match kind.as_str() {
            "block" => serde_json::from_value::<RawTextBlock>(value).map(decode_text_block),
            "captionedImage" | "image" => {
                serde_json::from_value::<RawImage>(value).map(ContentBlock::from)
            }
            "code" => serde_json::from_value::<RawCode>(value).map(ContentBlock::from),
            _ => {
                return ContentBlock::Unknown {
                    reason: format!("unsupported block type `{kind}`"),
                    kind,
                };
            }
        };

        decoded.unwrap_or_else(|err| ContentBlock::Unknown {
            reason: err.to_string(),
            kind,
        })
    }
}

impl From<RawImage> for CaptionedImage {
    fn from(raw: RawImage) -> Self {
        Self {
            image: ImageRef(raw.asset.reference),
            caption: raw.caption.filter(|c| !c.trim().is_empty()),
            with_y_margin: true,
        }
    }
}

impl From<RawImage> for ContentBlock {
    fn from(raw: RawImage) -> Self {
        ContentBlock::Image(raw.into())
    }
}

impl From<RawCode> for CodeBlock {
    fn from(raw: RawCode) -> Self {
        Self {
            code: raw.code,
            language: raw.language.filter(|l| !l.is_empty()),
        }
    }
}

impl From<RawCode> for ContentBlock {
    fn from(raw: RawCode) -> Self {
        ContentBlock::Code(raw.into())
    }
}

/// Decode a captioned image that is not part of a block list (e.g. the
/// showcase image of a project).
pub fn captioned_image_from_value(value: Value) -> Result<CaptionedImage, serde_json::Error> {
    serde_json::from_value::<RawImage>(value).map(CaptionedImage::from)
}

fn decode_text_block(raw: RawTextBlock) -> ContentBlock {
    let style = match raw.style.as_deref() {
        None | Some("normal") => BlockStyle::Paragraph,
        Some("h1") => BlockStyle::Heading(HeadingLevel::H1),
        Some("h2") => BlockStyle::Heading(HeadingLevel::H2),
        Some("h3") => BlockStyle::Heading(HeadingLevel::H3),
        Some(other) => {
            warn!(style = other, "unsupported block style, rendering as paragraph");
            BlockStyle::Paragraph
        }
    };

    let list = match raw.list_item.as_deref() {
        None => None,
        Some("bullet") => Some(ListKind::Bullet),
        Some("number") => Some(ListKind::Number),
        Some(other) => {
            warn!(list_item = other, "unsupported list kind, rendering as plain block");
            None
        }
    }
    .map(|kind| ListItem {
        kind,
        depth: list_depth(raw.level.as_ref()),
    });

    let mark_defs: Vec<MarkDef> = raw.mark_defs.iter().filter_map(MarkDef::from_value).collect();

    let spans = raw
        .children
        .into_iter()
        .filter_map(|child| {
            match child.kind.as_deref() {
                None | Some("span") => {}
                Some(other) => {
                    warn!(inline = other, "skipping unsupported inline object");
                    return None;
                }
            }
            let marks = child
                .marks
                .iter()
                .filter_map(|mark| match mark.as_str() {
                    Some(name) => resolve_mark(name, &mark_defs),
                    None => {
                        warn!(mark = %mark, "non-string mark, ignoring");
                        None
                    }
                })
                .collect();
            Some(Span::marked(child.text.unwrap_or_default(), marks))
        })
        .collect();

    ContentBlock::Text(TextBlock { style, list, spans })
}

/// Nesting depth from `level`: missing, zero, or non-numeric is 1, and
/// anything past `u8::MAX` is clamped.
fn list_depth(level: Option<&Value>) -> u8 {
    match level {
        None | Some(Value::Null) => 1,
        Some(value) => match value.as_u64() {
            Some(level) => u8::try_from(level).unwrap_or(u8::MAX).max(1),
            None => {
                warn!(level = %value, "invalid list level, using 1");
                1
            }
        },
    }
}

/// Resolve a span mark name: a decorator, or a key into the block's mark
/// definitions. Unknown marks are dropped.
fn resolve_mark(name: &str, defs: &[MarkDef]) -> Option<Mark> {
    match name {
        "strong" => return Some(Mark::Strong),
        "em" => return Some(Mark::Em),
        "code" => return Some(Mark::Code),
        _ => {}
    }
    match defs.iter().find(|d| d.key == name) {
        Some(def) if def.kind == "link" => match &def.href {
            Some(href) => Some(Mark::Link { href: href.clone() }),
            None => {
                warn!(mark = name, "link mark without href, ignoring");
                None
            }
        },
        Some(def) => {
            warn!(mark = name, kind = def.kind.as_str(), "unsupported mark definition, ignoring");
            None
        }
        None => {
            warn!(mark = name, "unknown mark, ignoring");
            None
        }
    }
}
