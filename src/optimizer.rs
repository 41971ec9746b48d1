use serde::{Deserialize, Serialize};

use crate::error::ImageError;

/// Quality used when the caller does not pick one.
pub const DEFAULT_QUALITY: u8 = 75;

/**
 * Query understood by the `/_next/image` optimization endpoint.
 */
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize, Hash)]
pub struct OptimizedImage {
    pub url: String,
    #[serde(rename = "w")]
    pub width: u32,
    #[serde(rename = "q")]
    pub quality: u8,
}

impl OptimizedImage {
    pub fn new(url: impl Into<String>, width: u32, quality: Option<u8>) -> Self {
        Self {
            url: url.into(),
            width,
            quality: quality.unwrap_or(DEFAULT_QUALITY),
        }
    }

    pub fn get_url_encoded(&self, origin: &str) -> Result<String, ImageError> {
        let params = serde_qs::to_string(&self)?;
        Ok(format!(
            "{}/_next/image?{}",
            origin.trim_end_matches('/'),
            params
        ))
    }

    pub fn from_url_encoded(url: &str) -> Result<OptimizedImage, ImageError> {
        let query = url.split_once('?').map_or(url, |(_, query)| query);
        Ok(serde_qs::from_str(query)?)
    }
}

/// Rewrites `src` to `<origin>/_next/image?url=<encoded>&w=<width>&q=<quality>`.
///
/// The query is form-encoded by `serde_qs`: a space becomes `+` rather than `%20`. The
/// endpoint decodes both to the same url.
pub fn optimized_url(
    origin: &str,
    src: &str,
    width: u32,
    quality: Option<u8>,
) -> Result<String, ImageError> {
    OptimizedImage::new(src, width, quality).get_url_encoded(origin)
}
