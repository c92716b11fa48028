//! Error type shared by every fallible operation in the crate.
//!
//! Messages carry offsets and tokens, never the original sensitive values.

use thiserror::Error;

/// Opaque failure reported by an external collaborator (detector or
/// generation service).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while redacting or restoring text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A span is reversed or reaches past the end of the text.
    #[error("span {start}..{end} is invalid for text of {len} bytes")]
    InvalidSpan {
        start: usize,
        end: usize,
        len: usize,
    },

    /// A span offset falls inside a multi-byte character.
    #[error("span {start}..{end} does not fall on character boundaries")]
    SpanNotCharBoundary { start: usize, end: usize },

    /// Two spans claim the same bytes.
    #[error("span {}..{} overlaps span {}..{}", .first.0, .first.1, .second.0, .second.1)]
    OverlappingSpans {
        first: (usize, usize),
        second: (usize, usize),
    },

    /// A token is already bound to a different original value.
    #[error("token `{token}` is already mapped to a different value")]
    TokenCollision { token: String },

    /// The token matcher could not be built.
    #[error("failed to build token matcher")]
    Matcher(#[from] aho_corasick::BuildError),

    /// The entity detector failed.
    #[error("entity detection failed")]
    Detector(#[source] BoxError),

    /// The text generation service failed.
    #[error("text generation failed")]
    Completion(#[source] BoxError),
}
