//! The seam to the external entity recognizer.
//!
//! A detector reports which byte ranges of a text are sensitive. The crate
//! does not judge detection quality; it only validates that spans are usable
//! before splicing tokens in.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::{category::Category, error::BoxError};

/// A labelled, half-open byte range of the original text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub category: Category,
    pub start: usize,
    pub end: usize,
}

impl EntitySpan {
    pub fn new(category: impl Into<Category>, start: usize, end: usize) -> Self {
        Self {
            category: category.into(),
            start,
            end,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Finds sensitive entities in text.
///
/// Implementations return spans in any order; the encoder sorts them. Spans
/// must not overlap. A failure is reported as an opaque [`BoxError`] and
/// surfaces as [`crate::Error::Detector`].
pub trait EntityDetector {
    /// Returns the spans of every entity in `text` whose category is one of
    /// `categories`.
    fn detect(&self, text: &str, categories: &[Category]) -> Result<Vec<EntitySpan>, BoxError>;
}

impl<D> EntityDetector for &D
where
    D: EntityDetector + ?Sized,
{
    fn detect(&self, text: &str, categories: &[Category]) -> Result<Vec<EntitySpan>, BoxError> {
        (**self).detect(text, categories)
    }
}

impl<D> EntityDetector for Box<D>
where
    D: EntityDetector + ?Sized,
{
    fn detect(&self, text: &str, categories: &[Category]) -> Result<Vec<EntitySpan>, BoxError> {
        (**self).detect(text, categories)
    }
}

#[cfg(feature = "patterns")]
pub use patterns::PatternDetector;

#[cfg(feature = "patterns")]
mod patterns {
    use std::sync::LazyLock;

    use regex::Regex;

    use super::{EntityDetector, EntitySpan};
    use crate::{
        category::{Category, Classification, EmailAddress, PhoneNumber, UsSsn},
        error::BoxError,
    };

    macro_rules! entity_pattern {
        ($name:ident, $regex_str:expr) => {
            static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
        };
    }

    entity_pattern!(
        RE_EMAIL,
        r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}"
    );

    entity_pattern!(
        RE_PHONE,
        r"(?:\+?1[-.\s]?)?(?:\(\d{3}\)\s?|\b\d{3}[-.\s]?)\d{3}[-.\s]?\d{4}\b"
    );

    entity_pattern!(RE_SSN, r"\b\d{3}-\d{2}-\d{4}\b");

    /// Regex-backed detector for the default categories.
    ///
    /// A lightweight stand-in for a named-entity recognizer: it finds email
    /// addresses, US phone numbers and US Social Security Numbers. Categories
    /// it has no pattern for are ignored.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct PatternDetector;

    impl PatternDetector {
        #[must_use]
        pub fn new() -> Self {
            Self
        }

        fn patterns() -> [(&'static str, &'static LazyLock<Option<Regex>>); 3] {
            [
                (EmailAddress::CATEGORY, &RE_EMAIL),
                (PhoneNumber::CATEGORY, &RE_PHONE),
                (UsSsn::CATEGORY, &RE_SSN),
            ]
        }
    }

    impl EntityDetector for PatternDetector {
        fn detect(
            &self,
            text: &str,
            categories: &[Category],
        ) -> Result<Vec<EntitySpan>, BoxError> {
            let mut spans = Vec::new();
            for (label, regex) in Self::patterns() {
                if !categories.iter().any(|category| category.as_str() == label) {
                    continue;
                }
                let Some(re) = regex.as_ref() else { continue };
                spans.extend(
                    re.find_iter(text)
                        .map(|m| EntitySpan::new(label, m.start(), m.end())),
                );
            }
            Ok(drop_overlapping(spans))
        }
    }

    /// Keeps the longer span wherever two spans overlap.
    fn drop_overlapping(mut spans: Vec<EntitySpan>) -> Vec<EntitySpan> {
        spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
        let mut kept: Vec<EntitySpan> = Vec::with_capacity(spans.len());
        for span in spans {
            match kept.last_mut() {
                Some(last) if span.start < last.end => {
                    if span.len() > last.len() {
                        *last = span;
                    }
                }
                _ => kept.push(span),
            }
        }
        kept
    }

}
