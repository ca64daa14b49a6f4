//! Error type for failures of the external collaborators.

use thiserror::Error;

/// A dependency the scan loop needs was unavailable.
///
/// These never abort anything: the affected tick (or candidate) is skipped
/// and retried on the next due scan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HighlightError {
    /// The world query service could not answer the overlap query.
    #[error("world query unavailable: {0}")]
    WorldUnavailable(String),
    /// The render service refused to create an annotation.
    #[error("annotation renderer unavailable: {0}")]
    RenderUnavailable(String),
}

impl HighlightError {
    pub fn world(err: impl std::fmt::Display) -> Self {
        Self::WorldUnavailable(err.to_string())
    }

    pub fn render(err: impl std::fmt::Display) -> Self {
        Self::RenderUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = HighlightError::world("physics scene not loaded");
        assert_eq!(
            err.to_string(),
            "world query unavailable: physics scene not loaded"
        );

        let err = HighlightError::render("no font");
        assert_eq!(err.to_string(), "annotation renderer unavailable: no font");
    }
}
