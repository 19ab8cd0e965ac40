//! Error types for chart rendering.
//!
//! Only malformed charts and bad input are fatal; geometry that cannot be
//! resolved and unknown note tags are logged and skipped by the renderer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The chart has no measures to lay out
    #[error("malformed score: chart has no measures")]
    NoMeasures,

    /// A slide group never closes a segment
    #[error("malformed score: slide group {group} has fewer than two path-bearing notes")]
    IncompleteSlide { group: usize },

    /// Chart or config JSON could not be decoded
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Render configuration is out of range
    #[error("invalid render config: {0}")]
    Config(String),
}

impl RenderError {
    /// Whether the error comes from the chart itself rather than from the
    /// way it was supplied.
    pub fn is_malformed_score(&self) -> bool {
        matches!(self, Self::NoMeasures | Self::IncompleteSlide { .. })
    }
}
