use thiserror::Error;

/// Errors surfaced by this crate.
///
/// Only [`ImageError::ContextMissing`] is ever raised by the components; failed loads are
/// absorbed into [`crate::LoadingStatus::Error`] and rendered by `<ImageFallback/>`.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image slot used outside of an <ImageRoot/>")]
    ContextMissing,
    #[error(transparent)]
    LoadFailure(#[from] LoadFailure),
    #[error("failed to encode optimized image url: {0}")]
    InvalidQuery(#[from] serde_qs::Error),
}

/// Why a probe could not load its source.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LoadFailure {
    #[error("no image source provided")]
    MissingSource,
    #[error("failed to load image `{src}`: {reason}")]
    Decode { src: String, reason: String },
}
