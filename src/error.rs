use thiserror::Error;

/// Failures that abort a detection run.
///
/// Degenerate candidates (zero hull area) are not represented here: they are
/// skipped where they are found and never reach the caller.
#[derive(Error, Debug)]
pub enum BoardScanError {
    #[error("Configuration error: {field} {reason}")]
    Configuration { field: String, reason: String },

    #[error("Segmentation failure: no pixel matched the board color band")]
    EmptyMask,

    #[error("No board found: the board mask has no connected region")]
    NoBoardFound,

    #[error("Image load error: {path}")]
    ImageLoad {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

impl BoardScanError {
    pub(crate) fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BoardScanError>;
