//! `slog` integration for the crate's types.
//!
//! Logging a [`Mapping`] emits its tokens as a structured JSON array via
//! `slog`'s nested-value support. Original values never reach the serializer:
//! a token is safe to log, the text behind it is not.
//!
//! This module does not configure `slog`. Loggers are supplied by the caller
//! through [`crate::Pseudonymizer::with_logger`] and
//! [`crate::RequestProcessor::with_logger`].

use serde_json::Value as JsonValue;
use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::{category::Category, mapping::Mapping};

impl SlogValue for Mapping {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let tokens = self
            .tokens()
            .map(|token| JsonValue::String(token.to_owned()))
            .collect();
        let nested = slog::Serde(JsonValue::Array(tokens));
        SlogValue::serialize(&nested, record, key, serializer)
    }
}

impl SlogValue for Category {
    fn serialize(
        &self,
        _record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        serializer.emit_str(key, self.as_str())
    }
}
