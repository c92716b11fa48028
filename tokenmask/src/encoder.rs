//! Splicing placeholder tokens into text.
//!
//! Spans are handled in descending order of start offset, so the rightmost
//! entity receives the lowest counter. The output itself is assembled in one
//! ascending pass over the untouched source: literal segments and tokens are
//! pushed into a single buffer, never spliced in place.

use crate::{
    allocator::PlaceholderAllocator,
    detector::EntitySpan,
    error::{Error, Result},
    mapping::Mapping,
};

/// Redacted text together with the mapping that reverses it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Redacted {
    pub text: String,
    pub mapping: Mapping,
}

impl Redacted {
    fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            mapping: Mapping::new(),
        }
    }
}

/// Replaces every span of `text` with a token from `allocator`.
///
/// Spans are byte offsets into `text`, in any order. They are validated up
/// front (in bounds, on character boundaries, not overlapping); a bad span is
/// an error and no counter moves. Two spans covering equal text still get
/// distinct tokens.
///
/// Empty `text` or empty `spans` return the text unchanged with an empty
/// mapping.
pub fn redact(
    text: &str,
    spans: &[EntitySpan],
    allocator: &mut PlaceholderAllocator,
) -> Result<Redacted> {
    if text.is_empty() || spans.is_empty() {
        return Ok(Redacted::unchanged(text));
    }

    let mut ordered: Vec<&EntitySpan> = spans.iter().collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));
    validate(text, &ordered)?;

    let mut mapping = Mapping::new();
    let mut assigned = Vec::with_capacity(ordered.len());
    for span in ordered {
        let token = allocator.allocate(span.category.as_str());
        mapping.insert(token.clone(), &text[span.range()])?;
        assigned.push((span, token));
    }

    let mut redacted = String::with_capacity(text.len());
    let mut cursor = 0;
    for (span, token) in assigned.iter().rev() {
        redacted.push_str(&text[cursor..span.start]);
        redacted.push_str(token);
        cursor = span.end;
    }
    redacted.push_str(&text[cursor..]);

    Ok(Redacted {
        text: redacted,
        mapping,
    })
}

/// Checks spans already sorted by descending start.
fn validate(text: &str, ordered: &[&EntitySpan]) -> Result<()> {
    for span in ordered {
        if span.start > span.end || span.end > text.len() {
            return Err(Error::InvalidSpan {
                start: span.start,
                end: span.end,
                len: text.len(),
            });
        }
        if !text.is_char_boundary(span.start) || !text.is_char_boundary(span.end) {
            return Err(Error::SpanNotCharBoundary {
                start: span.start,
                end: span.end,
            });
        }
    }
    for pair in ordered.windows(2) {
        let (right, left) = (pair[0], pair[1]);
        if left.end > right.start {
            return Err(Error::OverlappingSpans {
                first: (left.start, left.end),
                second: (right.start, right.end),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_a_single_span() {
        let mut allocator = PlaceholderAllocator::new();
        let spans = [EntitySpan::new("US_SSN", 10, 21)];
        let out = redact("My SSN is 123-45-6789", &spans, &mut allocator).unwrap();
        assert_eq!(out.text, "My SSN is US_SSN_0001");
        assert_eq!(out.mapping.get("US_SSN_0001"), Some("123-45-6789"));
        assert_eq!(out.mapping.len(), 1);
    }

    #[test]
    fn rightmost_span_gets_the_first_counter() {
        let mut allocator = PlaceholderAllocator::new();
        let text = "a@b.com and c@d.com";
        let spans = [
            EntitySpan::new("EMAIL_ADDRESS", 0, 7),
            EntitySpan::new("EMAIL_ADDRESS", 12, 19),
        ];
        let out = redact(text, &spans, &mut allocator).unwrap();
        assert_eq!(out.text, "EMAIL_ADDRESS_0002 and EMAIL_ADDRESS_0001");
        assert_eq!(out.mapping.get("EMAIL_ADDRESS_0001"), Some("c@d.com"));
        assert_eq!(out.mapping.get("EMAIL_ADDRESS_0002"), Some("a@b.com"));
    }

    #[test]
    fn identical_values_get_distinct_tokens() {
        let mut allocator = PlaceholderAllocator::new();
        let text = "x@y.io, x@y.io";
        let spans = [
            EntitySpan::new("EMAIL_ADDRESS", 8, 14),
            EntitySpan::new("EMAIL_ADDRESS", 0, 6),
        ];
        let out = redact(text, &spans, &mut allocator).unwrap();
        assert_eq!(out.mapping.len(), 2);
        assert_eq!(out.text, "EMAIL_ADDRESS_0002, EMAIL_ADDRESS_0001");
    }

    #[test]
    fn adjacent_spans_are_not_overlapping() {
        let mut allocator = PlaceholderAllocator::new();
        let spans = [EntitySpan::new("A", 0, 3), EntitySpan::new("B", 3, 6)];
        let out = redact("abcdef", &spans, &mut allocator).unwrap();
        assert_eq!(out.text, "A_0001B_0001");
    }

    #[test]
    fn empty_inputs_are_no_ops() {
        let mut allocator = PlaceholderAllocator::new();
        let out = redact("", &[EntitySpan::new("US_SSN", 0, 11)], &mut allocator).unwrap();
        assert_eq!(out, Redacted::default());

        let out = redact("nothing here", &[], &mut allocator).unwrap();
        assert_eq!(out.text, "nothing here");
        assert!(out.mapping.is_empty());
        assert_eq!(allocator.counter("US_SSN"), 0);
    }

    #[test]
    fn out_of_bounds_span_fails_without_allocating() {
        let mut allocator = PlaceholderAllocator::new();
        let spans = [EntitySpan::new("US_SSN", 0, 2), EntitySpan::new("US_SSN", 5, 40)];
        let err = redact("short text", &spans, &mut allocator).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSpan {
                start: 5,
                end: 40,
                len: 10
            }
        ));
        assert_eq!(allocator.counter("US_SSN"), 0);
    }

    #[test]
    fn reversed_span_is_invalid() {
        let mut allocator = PlaceholderAllocator::new();
        let err = redact("abcdef", &[EntitySpan::new("A", 4, 2)], &mut allocator).unwrap_err();
        assert!(matches!(err, Error::InvalidSpan { .. }));
    }

    #[test]
    fn span_inside_a_character_is_rejected() {
        let mut allocator = PlaceholderAllocator::new();
        let err = redact("café", &[EntitySpan::new("PERSON", 0, 4)], &mut allocator).unwrap_err();
        assert!(matches!(err, Error::SpanNotCharBoundary { start: 0, end: 4 }));
    }

    #[test]
    fn overlapping_spans_are_rejected() {
        let mut allocator = PlaceholderAllocator::new();
        let spans = [EntitySpan::new("A", 0, 5), EntitySpan::new("B", 3, 8)];
        let err = redact("0123456789", &spans, &mut allocator).unwrap_err();
        assert!(matches!(
            err,
            Error::OverlappingSpans {
                first: (0, 5),
                second: (3, 8)
            }
        ));
        assert_eq!(allocator.counter("A"), 0);
    }

    #[test]
    fn multibyte_text_keeps_offsets_valid() {
        let mut allocator = PlaceholderAllocator::new();
        let text = "Zoë écrit à zoë@exemple.fr";
        let start = text.find("zoë@").unwrap();
        let spans = [EntitySpan::new("EMAIL_ADDRESS", start, text.len())];
        let out = redact(text, &spans, &mut allocator).unwrap();
        assert_eq!(out.text, "Zoë écrit à EMAIL_ADDRESS_0001");
        assert_eq!(out.mapping.get("EMAIL_ADDRESS_0001"), Some("zoë@exemple.fr"));
    }
}
