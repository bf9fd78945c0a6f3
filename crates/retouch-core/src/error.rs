use std::path::PathBuf;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Every way a session operation can fail.
///
/// All variants are recoverable: the session that produced one is left
/// exactly as it was before the call.
#[derive(Error, Debug)]
pub enum EditError {
    #[error("no image loaded")]
    NoImageLoaded,

    #[error("image not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write image {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// Crop box is degenerate or reaches outside the image.
    #[error("invalid crop region: {0}")]
    InvalidRegion(String),

    #[error("invalid dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("invalid rotation angle {0}")]
    InvalidAngle(f64),

    #[error("channel swap needs exactly 3 channels, image has {0}")]
    UnsupportedChannelCount(usize),

    #[error("channel order {0:?} is not a permutation of [0, 1, 2]")]
    InvalidChannelOrder(Vec<i64>),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// A named argument was missing or had the wrong shape and the target
    /// operation has no more specific failure for it.
    #[error("{operation}: invalid argument `{name}`: {reason}")]
    InvalidArgument {
        operation: &'static str,
        name: &'static str,
        reason: String,
    },

    #[error("rendering failed: {source}")]
    Render {
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EditError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Self::Write {
            path: path.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EditError>;
