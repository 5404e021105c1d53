//! Image asset resolution.
//!
//! Content never embeds image URLs directly: image blocks and showcase media
//! carry an opaque asset reference, and the renderer asks an
//! [`AssetResolver`] for a URL at a target width. The width is a rendering
//! decision (showcase cards use a narrow fixed width, article bodies a wider
//! one); the reference alone identifies the asset.
//!
//! ## Reference format
//!
//! ```text
//! image-<id>-<W>x<H>-<ext>
//! image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg
//! ```
//!
//! [`CdnAssetResolver`] maps that to
//! `<cdn_base>/<project_id>/<dataset>/<id>-<W>x<H>.<ext>?w=<width>`.

use crate::blocks::ImageRef;
use crate::config::AssetsConfig;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AssetError {
    #[error("malformed image reference: {0}")]
    MalformedRef(String),
}

/// Resolves an image reference to a concrete URL at a target width.
pub trait AssetResolver: Send + Sync {
    fn image_url(&self, image: &ImageRef, width: u32) -> Result<String, AssetError>;
}

/// The parts of an `image-<id>-<W>x<H>-<ext>` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetId<'a> {
    pub id: &'a str,
    pub width: u32,
    pub height: u32,
    pub extension: &'a str,
}

/// Split an image reference into its parts.
pub fn parse_image_ref(reference: &str) -> Result<AssetId<'_>, AssetError> {
    let malformed = || AssetError::MalformedRef(reference.to_string());

    let rest = reference.strip_prefix("image-").ok_or_else(malformed)?;
    let (rest, extension) = rest.rsplit_once('-').ok_or_else(malformed)?;
    let (id, dimensions) = rest.rsplit_once('-').ok_or_else(malformed)?;
    let (width, height) = dimensions.split_once('x').ok_or_else(malformed)?;

    let valid_part = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric());
    if !valid_part(id) || !valid_part(extension) {
        return Err(malformed());
    }

    Ok(AssetId {
        id,
        width: width.parse().map_err(|_| malformed())?,
        height: height.parse().map_err(|_| malformed())?,
        extension,
    })
}

/// Resolves references against an image CDN.
#[derive(Debug, Clone)]
pub struct CdnAssetResolver {
    base_url: String,
    project_id: String,
    dataset: String,
}

impl CdnAssetResolver {
    pub fn new(
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        dataset: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            dataset: dataset.into(),
        }
    }

    pub fn from_config(config: &AssetsConfig) -> Self {
        Self::new(&config.cdn_base, &config.project_id, &config.dataset)
    }
}

impl AssetResolver for CdnAssetResolver {
    fn image_url(&self, image: &ImageRef, width: u32) -> Result<String, AssetError> {
        let asset = parse_image_ref(&image.0)?;
        Ok(format!(
            "{}/{}/{}/{}-{}x{}.{}?w={}",
            self.base_url,
            self.project_id,
            self.dataset,
            asset.id,
            asset.width,
            asset.height,
            asset.extension,
            width
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> CdnAssetResolver {
        CdnAssetResolver::new("https://cdn.example.com/images/", "p1", "production")
    }

    #[test]
    fn parses_reference_parts() {
        let asset = parse_image_ref("image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg").unwrap();
        assert_eq!(asset.id, "Tb9Ew8CXIwaY6R1kjMvI0uRR");
        assert_eq!(asset.width, 2000);
        assert_eq!(asset.height, 3000);
        assert_eq!(asset.extension, "jpg");
    }

    #[test]
    fn resolves_url_with_width() {
        let url = resolver()
            .image_url(&ImageRef("image-abc123-800x600-png".into()), 600)
            .unwrap();
        assert_eq!(
            url,
            "https://cdn.example.com/images/p1/production/abc123-800x600.png?w=600"
        );
    }

    #[test]
    fn width_changes_only_query() {
        let r = resolver();
        let img = ImageRef("image-abc123-800x600-png".into());
        let narrow = r.image_url(&img, 600).unwrap();
        let wide = r.image_url(&img, 1200).unwrap();
        assert_eq!(
            narrow.split('?').next(),
            wide.split('?').next(),
            "path must not depend on width"
        );
        assert!(wide.ends_with("?w=1200"));
    }

    #[test]
    fn rejects_malformed_references() {
        for bad in [
            "",
            "abc123-800x600-png",
            "image-abc123-png",
            "image-abc123-800by600-png",
            "image--800x600-png",
            "image-abc123-800x600-",
            "image-abc/../x-800x600-png",
        ] {
            assert_eq!(
                parse_image_ref(bad),
                Err(AssetError::MalformedRef(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }
}
