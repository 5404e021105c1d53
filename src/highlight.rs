//! Syntax highlighting for code blocks.
//!
//! The renderer only knows the [`Highlighter`] trait: given source text and a
//! language tag it either returns highlighted markup or `None`, in which case
//! the renderer falls back to escaped plain text. [`SyntectHighlighter`]
//! emits class-based spans (`<span class="hl-keyword">`) so the colors live
//! in a stylesheet generated once per build by [`SyntectHighlighter::stylesheet`].

use syntect::highlighting::ThemeSet;
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use tracing::{debug, warn};

/// Produces highlighted HTML for a code block.
///
/// Returned markup is inserted verbatim, so implementations must escape the
/// source text themselves.
pub trait Highlighter: Send + Sync {
    fn highlight(&self, source: &str, language: &str) -> Option<String>;
}

/// Never highlights; every code block renders as escaped plain text.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainText;

impl Highlighter for PlainText {
    fn highlight(&self, _source: &str, _language: &str) -> Option<String> {
        None
    }
}

pub struct SyntectHighlighter {
    syntaxes: SyntaxSet,
    class_prefix: &'static str,
}

impl SyntectHighlighter {
    /// `ClassStyle` borrows its prefix for `'static`, so a prefix read from
    /// config is leaked once by the caller rather than per highlighter.
    pub fn new(class_prefix: &'static str) -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            class_prefix,
        }
    }

    fn class_style(&self) -> ClassStyle {
        ClassStyle::SpacedPrefixed {
            prefix: self.class_prefix,
        }
    }

    /// CSS for the named theme, scoped to this highlighter's class prefix.
    ///
    /// Falls back to the first bundled theme when `theme` is unknown.
    pub fn stylesheet(&self, theme: &str) -> String {
        let themes = ThemeSet::load_defaults();
        let Some(theme_def) = themes
            .themes
            .get(theme)
            .or_else(|| themes.themes.values().next())
        else {
            return String::new();
        };
        if !themes.themes.contains_key(theme) {
            warn!(theme, "unknown highlight theme, using a bundled default");
        }
        css_for_theme_with_class_style(theme_def, self.class_style()).unwrap_or_default()
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, source: &str, language: &str) -> Option<String> {
        let syntax = self
            .syntaxes
            .find_syntax_by_token(language)
            .or_else(|| self.syntaxes.find_syntax_by_name(language))?;

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, self.class_style());
        for line in LinesWithEndings::from(source) {
            if let Err(err) = generator.parse_html_for_line_which_includes_newline(line) {
                debug!(language, %err, "highlighting failed");
                return None;
            }
        }
        Some(generator.finalize())
    }
}
