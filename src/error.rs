use std::io;

use thiserror::Error;

/// Everything that can go wrong while converting one WAV file.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unsupported bit depth: {0}-bit (only 16-bit and 24-bit PCM is supported)")]
    UnsupportedBitDepth(u16),

    #[error("unsupported sample encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("not a valid WAV file: {0}")]
    BadContainer(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ConvertError {
    /// Unsupported inputs are skipped with a notice; corrupt containers and
    /// I/O problems count as failures.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            ConvertError::UnsupportedBitDepth(_) | ConvertError::UnsupportedEncoding(_)
        )
    }
}

impl From<hound::Error> for ConvertError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => ConvertError::Io(e),
            hound::Error::Unsupported => {
                ConvertError::UnsupportedEncoding("non-PCM WAV encoding".to_string())
            }
            other => ConvertError::BadContainer(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
