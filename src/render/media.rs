//! Captioned images and code blocks.

use super::Renderer;
use crate::blocks::{CaptionedImage, CodeBlock};
use maud::{Markup, PreEscaped, html};
use tracing::{debug, warn};

impl Renderer<'_> {
    /// Render a captioned image as a `figure`.
    ///
    /// Returns `None` when the image reference cannot be resolved; the block
    /// is then skipped.
    pub fn captioned_image(&self, image: &CaptionedImage) -> Option<Markup> {
        let url = match self.assets.image_url(&image.image, self.image_width) {
            Ok(url) => url,
            Err(err) => {
                warn!(%err, "skipping image block");
                return None;
            }
        };
        let alt = image.caption.as_deref().unwrap_or("");

        Some(html! {
            figure.captioned-image.with-y-margin[image.with_y_margin] {
                img src=(url) alt=(alt) loading="lazy";
                @if let Some(caption) = &image.caption {
                    figcaption.caption { (caption) }
                }
            }
        })
    }

    /// Render a code block, highlighted when the language is recognized.
    pub fn code_block(&self, block: &CodeBlock) -> Markup {
        let highlighted = block.language.as_deref().and_then(|language| {
            let out = self.highlighter.highlight(&block.code, language);
            if out.is_none() {
                debug!(language, "rendering code block as plain text");
            }
            out
        });
        let class = block.language.as_ref().map(|l| format!("language-{l}"));

        html! {
            div.code-block-container {
                pre {
                    code class=[class] {
                        @match highlighted {
                            Some(markup) => (PreEscaped(markup)),
                            None => (block.code),
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::blocks::{CaptionedImage, CodeBlock, ImageRef};
    use crate::highlight::{PlainText, SyntectHighlighter};
    use crate::render::Renderer;
    use crate::test_helpers::test_assets;

    fn image(reference: &str, caption: Option<&str>, with_y_margin: bool) -> CaptionedImage {
        CaptionedImage {
            image: ImageRef(reference.into()),
            caption: caption.map(String::from),
            with_y_margin,
        }
    }

    #[test]
    fn image_with_caption() {
        let assets = test_assets();
        let renderer = Renderer::new(&assets, &PlainText, 800);
        let html = renderer
            .captioned_image(&image("image-abc-10x10-png", Some("A <cat>"), true))
            .unwrap()
            .into_string();
        assert!(html.starts_with(r#"<figure class="captioned-image with-y-margin">"#));
        assert!(html.contains("abc-10x10.png?w=800"));
        assert!(html.contains(r#"<figcaption class="caption">A &lt;cat&gt;</figcaption>"#));
    }

    #[test]
    fn margin_flag_only_changes_wrapper_class() {
        let assets = test_assets();
        let renderer = Renderer::new(&assets, &PlainText, 800);
        let with = renderer
            .captioned_image(&image("image-abc-10x10-png", None, true))
            .unwrap()
            .into_string();
        let without = renderer
            .captioned_image(&image("image-abc-10x10-png", None, false))
            .unwrap()
            .into_string();
        assert!(without.starts_with(r#"<figure class="captioned-image">"#));
        assert_eq!(with.replace(" with-y-margin", ""), without);
    }

    #[test]
    fn image_without_caption_has_no_figcaption() {
        let assets = test_assets();
        let renderer = Renderer::new(&assets, &PlainText, 800);
        let html = renderer
            .captioned_image(&image("image-abc-10x10-png", None, true))
            .unwrap()
            .into_string();
        assert!(!html.contains("figcaption"));
        assert!(html.contains(r#"alt="""#));
    }

    #[test]
    fn unresolvable_image_is_skipped() {
        let assets = test_assets();
        let renderer = Renderer::new(&assets, &PlainText, 800);
        assert!(
            renderer
                .captioned_image(&image("not-a-ref", None, true))
                .is_none()
        );
    }

    #[test]
    fn code_block_plain_text_fallback_escapes() {
        let assets = test_assets();
        let renderer = Renderer::new(&assets, &PlainText, 800);
        let html = renderer
            .code_block(&CodeBlock {
                code: "if a < b { }".into(),
                language: Some("rust".into()),
            })
            .into_string();
        assert_eq!(
            html,
            r#"<div class="code-block-container"><pre><code class="language-rust">if a &lt; b { }</code></pre></div>"#
        );
    }

    #[test]
    fn code_block_without_language_has_no_class() {
        let assets = test_assets();
        let renderer = Renderer::new(&assets, &PlainText, 800);
        let html = renderer
            .code_block(&CodeBlock {
                code: "plain".into(),
                language: None,
            })
            .into_string();
        assert!(html.contains("<code>plain</code>"));
    }

    #[test]
    fn code_block_highlighted_with_known_language() {
        let assets = test_assets();
        let highlighter = SyntectHighlighter::new("hl-");
        let renderer = Renderer::new(&assets, &highlighter, 800);
        let html = renderer
            .code_block(&CodeBlock {
                code: "fn main() {}\n".into(),
                language: Some("rust".into()),
            })
            .into_string();
        assert!(html.contains(r#"<code class="language-rust"><span class="hl-"#));
    }

    #[test]
    fn code_block_unknown_language_falls_back() {
        let assets = test_assets();
        let highlighter = SyntectHighlighter::new("hl-");
        let renderer = Renderer::new(&assets, &highlighter, 800);
        let html = renderer
            .code_block(&CodeBlock {
                code: "<tag>".into(),
                language: Some("klingon".into()),
            })
            .into_string();
        assert!(html.contains(r#"<code class="language-klingon">&lt;tag&gt;</code>"#));
    }
}
