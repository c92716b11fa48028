//! End-to-end tests for the core redact and restore API.
//!
//! These tests exercise:
//! - token allocation across sequential calls on one allocator,
//! - span validation and splicing in the encoder, and
//! - full-text restoration against the produced mapping.

use std::{
    sync::{Arc, Mutex},
    thread,
};

use proptest::{prelude::*, sample::Index};
use tokenmask::{
    redact, restore, Category, EntityDetector, EntitySpan, Error, Mapping, PlaceholderAllocator,
    Restorer,
};

const CATEGORIES: [&str; 5] = ["EMAIL_ADDRESS", "ADDRESS", "US_SSN", "PHONE_NUMBER", "PERSON"];

/// Lowercase text, multibyte characters included, with non-overlapping
/// spans on character boundaries.
fn redaction_case() -> impl Strategy<Value = (String, Vec<EntitySpan>)> {
    (
        "[a-z .,@éüß✓日本]{0,48}",
        prop::collection::vec(any::<Index>(), 0..12),
        prop::collection::vec(0..CATEGORIES.len(), 6),
    )
        .prop_map(|(text, points, categories)| {
            let boundaries: Vec<usize> = text
                .char_indices()
                .map(|(offset, _)| offset)
                .chain([text.len()])
                .collect();
            let mut offsets: Vec<usize> = points
                .iter()
                .map(|point| boundaries[point.index(boundaries.len())])
                .collect();
            offsets.sort_unstable();
            offsets.dedup();
            let spans = offsets
                .chunks_exact(2)
                .zip(categories)
                .map(|(pair, category)| EntitySpan::new(CATEGORIES[category], pair[0], pair[1]))
                .collect();
            (text, spans)
        })
}

#[test]
fn test_redacts_ssn_at_detector_offsets() {
    let mut allocator = PlaceholderAllocator::new();
    let redacted = redact(
        "My SSN is 123-45-6789",
        &[EntitySpan::new("US_SSN", 10, 21)],
        &mut allocator,
    )
    .unwrap();

    assert_eq!(redacted.text, "My SSN is US_SSN_0001");
    let expected: Mapping = [("US_SSN_0001", "123-45-6789")].into_iter().collect();
    assert_eq!(redacted.mapping, expected);
}

#[test]
fn test_sequential_calls_never_collide() {
    let mut allocator = PlaceholderAllocator::new();
    let first = redact(
        "write to a@b.com",
        &[EntitySpan::new("EMAIL_ADDRESS", 9, 16)],
        &mut allocator,
    )
    .unwrap();
    let second = redact(
        "or c@d.com",
        &[EntitySpan::new("EMAIL_ADDRESS", 3, 10)],
        &mut allocator,
    )
    .unwrap();

    assert_eq!(first.text, "write to EMAIL_ADDRESS_0001");
    assert_eq!(second.text, "or EMAIL_ADDRESS_0002");

    let mut combined = first.mapping;
    combined.merge(second.mapping).unwrap();
    assert_eq!(combined.len(), 2);
}

#[test]
fn test_round_trip_restores_original_text() {
    let mut allocator = PlaceholderAllocator::new();
    let text = "Reach John at john@example.com or 555-123-4567, SSN 123-45-6789.";
    let spans = [
        EntitySpan::new("PHONE_NUMBER", 34, 46),
        EntitySpan::new("PERSON", 6, 10),
        EntitySpan::new("US_SSN", 52, 63),
        EntitySpan::new("EMAIL_ADDRESS", 14, 30),
    ];
    let redacted = redact(text, &spans, &mut allocator).unwrap();

    assert_eq!(
        redacted.text,
        "Reach PERSON_0001 at EMAIL_ADDRESS_0001 or PHONE_NUMBER_0001, SSN US_SSN_0001."
    );
    assert_eq!(restore(&redacted.text, &redacted.mapping).unwrap(), text);
}

proptest! {
    #[test]
    fn test_round_trip_holds_for_any_spans((text, spans) in redaction_case()) {
        let mut allocator = PlaceholderAllocator::new();
        let redacted = redact(&text, &spans, &mut allocator).unwrap();
        prop_assert_eq!(redacted.mapping.len(), spans.len());
        prop_assert_eq!(restore(&redacted.text, &redacted.mapping).unwrap(), text);
    }

    #[test]
    fn test_round_trip_holds_across_calls_on_one_allocator(
        first in redaction_case(),
        second in redaction_case(),
    ) {
        let mut allocator = PlaceholderAllocator::new();
        let a = redact(&first.0, &first.1, &mut allocator).unwrap();
        let b = redact(&second.0, &second.1, &mut allocator).unwrap();
        let mut combined = a.mapping;
        combined.merge(b.mapping).unwrap();
        prop_assert_eq!(restore(&a.text, &combined).unwrap(), first.0);
        prop_assert_eq!(restore(&b.text, &combined).unwrap(), second.0);
    }

    #[test]
    fn test_text_without_tokens_is_unchanged(text in "[a-z0-9 .,_@éü✓]{0,64}") {
        let mapping: Mapping = [
            ("EMAIL_ADDRESS_0001", "john@example.com"),
            ("US_SSN_0001", "123-45-6789"),
            ("PERSON_0001", "Ada"),
        ]
        .into_iter()
        .collect();
        prop_assert_eq!(restore(&text, &mapping).unwrap(), text.as_str());
        prop_assert_eq!(restore(&text, &Mapping::new()).unwrap(), text);
    }
}

#[test]
fn test_restore_handles_rewritten_responses() {
    let mapping: Mapping = [
        ("EMAIL_ADDRESS_0001", "john@example.com"),
        ("PERSON_0001", "John"),
    ]
    .into_iter()
    .collect();
    let response = "Dear PERSON_0001, we will write to EMAIL_ADDRESS_0001. \
                    PERSON_0001, please confirm EMAIL_ADDRESS_0001 is correct.";
    assert_eq!(
        restore(response, &mapping).unwrap(),
        "Dear John, we will write to john@example.com. \
         John, please confirm john@example.com is correct."
    );
}

#[test]
fn test_clean_text_is_untouched() {
    let mapping: Mapping = [("US_SSN_0001", "123-45-6789")].into_iter().collect();
    let restorer = Restorer::new(&mapping).unwrap();
    for text in ["", "plain", "US_SSN_000", "us_ssn_0001", "US_SSN_0002"] {
        assert_eq!(restorer.restore(text), text);
    }
}

#[test]
fn test_invalid_spans_leave_allocator_untouched() {
    let mut allocator = PlaceholderAllocator::new();
    let text = "0123456789";

    let cases = [
        vec![EntitySpan::new("A", 2, 20)],
        vec![EntitySpan::new("A", 6, 3)],
        vec![EntitySpan::new("A", 0, 4), EntitySpan::new("A", 3, 6)],
    ];
    for spans in cases {
        assert!(redact(text, &spans, &mut allocator).is_err());
    }
    assert_eq!(allocator.counter("A"), 0);

    let err = redact("ünï", &[EntitySpan::new("A", 1, 3)], &mut allocator).unwrap_err();
    assert!(matches!(err, Error::SpanNotCharBoundary { .. }));
}

#[test]
fn test_error_messages_never_carry_values() {
    let mut mapping = Mapping::new();
    mapping.insert("PERSON_0001", "Ada Lovelace").unwrap();
    let err = mapping.insert("PERSON_0001", "Grace Hopper").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("PERSON_0001"));
    assert!(!message.contains("Ada") && !message.contains("Grace"));
}

#[cfg(not(feature = "testing"))]
#[test]
fn test_mapping_debug_hides_values() {
    let mapping: Mapping = [
        ("EMAIL_ADDRESS_0001", "john@example.com"),
        ("US_SSN_0001", "123-45-6789"),
    ]
    .into_iter()
    .collect();
    assert_eq!(
        format!("{mapping:?}"),
        r#"{"EMAIL_ADDRESS_0001": "[REDACTED]", "US_SSN_0001": "[REDACTED]"}"#
    );
}

#[test]
fn test_mapping_serializes_flat() {
    let mapping: Mapping = [
        ("EMAIL_ADDRESS_0001", "john@example.com"),
        ("US_SSN_0001", "123-45-6789"),
    ]
    .into_iter()
    .collect();
    let json = serde_json::to_value(&mapping).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "EMAIL_ADDRESS_0001": "john@example.com",
            "US_SSN_0001": "123-45-6789",
        })
    );
}

#[test]
fn test_shared_allocator_behind_a_mutex() {
    let allocator = Arc::new(Mutex::new(PlaceholderAllocator::new()));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let allocator = Arc::clone(&allocator);
            thread::spawn(move || {
                let mut allocator = allocator.lock().unwrap();
                redact("id 123-45-6789", &[EntitySpan::new("US_SSN", 3, 14)], &mut allocator)
                    .unwrap()
                    .text
            })
        })
        .collect();

    let mut texts: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    texts.sort();
    texts.dedup();
    assert_eq!(texts.len(), 8);
    assert_eq!(allocator.lock().unwrap().counter("US_SSN"), 8);
}

#[test]
fn test_custom_detector_plugs_into_redact() {
    struct Keyword(&'static str);

    impl EntityDetector for Keyword {
        fn detect(
            &self,
            text: &str,
            categories: &[Category],
        ) -> Result<Vec<EntitySpan>, tokenmask::BoxError> {
            if !categories.iter().any(|c| c.as_str() == "PERSON") {
                return Ok(Vec::new());
            }
            Ok(text
                .match_indices(self.0)
                .map(|(start, m)| EntitySpan::new("PERSON", start, start + m.len()))
                .collect())
        }
    }

    let detector = Keyword("Ada");
    let text = "Ada met Ada";
    let spans = detector.detect(text, &[Category::from("PERSON")]).unwrap();
    let mut allocator = PlaceholderAllocator::new();
    let redacted = redact(text, &spans, &mut allocator).unwrap();
    assert_eq!(redacted.text, "PERSON_0002 met PERSON_0001");
    assert_eq!(restore(&redacted.text, &redacted.mapping).unwrap(), text);
}

#[cfg(feature = "patterns")]
#[test]
fn test_pattern_detector_round_trip() {
    use tokenmask::{PatternDetector, DEFAULT_CATEGORIES};

    let categories: Vec<Category> = DEFAULT_CATEGORIES.into_iter().map(Category::from).collect();
    let text = "SSN 123-45-6789, email john@example.com, phone (555) 123-4567.";
    let spans = PatternDetector::new().detect(text, &categories).unwrap();
    assert_eq!(spans.len(), 3);

    let mut allocator = PlaceholderAllocator::new();
    let redacted = redact(text, &spans, &mut allocator).unwrap();
    assert!(!redacted.text.contains("123-45-6789"));
    assert!(!redacted.text.contains("john@example.com"));
    assert!(redacted.text.contains("US_SSN_0001"));
    assert_eq!(restore(&redacted.text, &redacted.mapping).unwrap(), text);
}
