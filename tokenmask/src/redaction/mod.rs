//! Structured redaction: walking values and redacting their marked fields.
//!
//! This module ties the pieces together:
//!
//! - **`sensitive`**: Domain layer - types that contain text to scan (`SensitiveType`)
//! - **`redact`**: Application layer - the mapper that turns text into tokens
//!   (`RedactionMapper`) and whole-value classification (`Classifiable`)
//!
//! Category markers live in `crate::category`. The derive macro in
//! `tokenmask-derive` generates `SensitiveType` implementations that call into
//! these traits.

mod redact;
mod sensitive;

pub use redact::{Classifiable, RedactionMapper};
pub use sensitive::SensitiveType;
