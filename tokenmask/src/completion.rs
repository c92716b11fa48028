//! The seam to the external text generation service.

use crate::error::BoxError;

/// Fragments of a streamed response, in production order.
///
/// Each item is a fragment or the failure that ended the stream.
pub type FragmentStream<'a> = Box<dyn Iterator<Item = Result<String, BoxError>> + 'a>;

/// A text generation service that only ever sees redacted text.
///
/// Implementations wrap whatever client talks to the real service. They
/// receive tokenized prompts and are expected to echo tokens back verbatim
/// where the response refers to them.
pub trait CompletionService {
    /// Produces a complete response to the redacted `system` and `user`
    /// prompts.
    fn complete(&self, system: &str, user: &str) -> Result<String, BoxError>;

    /// Produces a response as a stream of fragments.
    fn complete_stream(&self, system: &str, user: &str) -> Result<FragmentStream<'_>, BoxError>;
}

impl<C> CompletionService for &C
where
    C: CompletionService + ?Sized,
{
    fn complete(&self, system: &str, user: &str) -> Result<String, BoxError> {
        (**self).complete(system, user)
    }

    fn complete_stream(&self, system: &str, user: &str) -> Result<FragmentStream<'_>, BoxError> {
        (**self).complete_stream(system, user)
    }
}

impl<C> CompletionService for Box<C>
where
    C: CompletionService + ?Sized,
{
    fn complete(&self, system: &str, user: &str) -> Result<String, BoxError> {
        (**self).complete(system, user)
    }

    fn complete_stream(&self, system: &str, user: &str) -> Result<FragmentStream<'_>, BoxError> {
        (**self).complete_stream(system, user)
    }
}
