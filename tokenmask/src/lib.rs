//! Reversible placeholder tokens for sensitive text.
//!
//! This crate keeps personal identifiers away from a third-party text
//! generation service. Sensitive spans are swapped for typed placeholder tokens
//! such as `EMAIL_ADDRESS_0001` before the text leaves the process, and the
//! original values are put back into whatever comes back, including responses
//! that arrive as a stream of fragments.
//!
//! The pieces, leaves first:
//!
//! - [`PlaceholderAllocator`]: mints `CATEGORY_NNNN` tokens from per-category counters.
//! - [`redact`]: splices tokens into text at detector-supplied spans and builds a [`Mapping`].
//! - [`restore`] / [`Restorer`]: puts original values back into complete text.
//! - [`StreamingDecoder`]: puts original values back into fragmented text without
//!   ever releasing a partial token.
//!
//! Around the core:
//!
//! - [`EntityDetector`] and [`CompletionService`] are the seams to the external
//!   recognizer and generation service.
//! - `#[derive(Pseudonymize)]` walks structs and enums and redacts the fields
//!   marked `#[sensitive]` through one shared allocator.
//! - [`Pseudonymizer`] and [`RequestProcessor`] wire everything into a
//!   redact, complete, restore pipeline with `slog` logging.
//!
//! ```rust
//! use tokenmask::{redact, restore, EntitySpan, PlaceholderAllocator, StreamingDecoder};
//!
//! let mut allocator = PlaceholderAllocator::new();
//! let text = "My SSN is 123-45-6789";
//! let redacted = redact(text, &[EntitySpan::new("US_SSN", 10, 21)], &mut allocator)?;
//! assert_eq!(redacted.text, "My SSN is US_SSN_0001");
//!
//! let reply = "Noted: US_SSN_0001.";
//! assert_eq!(restore(reply, &redacted.mapping)?, "Noted: 123-45-6789.");
//!
//! let mut decoder = StreamingDecoder::new(&redacted.mapping)?;
//! let mut out = String::new();
//! for fragment in ["Noted: US_", "SSN_00", "01."] {
//!     out.push_str(&decoder.process_fragment(fragment));
//! }
//! out.push_str(&decoder.finalize());
//! assert_eq!(out, "Noted: 123-45-6789.");
//! # Ok::<(), tokenmask::Error>(())
//! ```
//!
//! What this crate does not do:
//! - decide what is sensitive (that is the detector's job)
//! - talk to any network service
//! - persist mappings

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::enum_glob_use,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

pub use tokenmask_derive::Pseudonymize;

#[allow(unused_extern_crates)]
extern crate self as tokenmask;

// Module declarations
mod allocator;
mod category;
mod completion;
mod decoder;
mod detector;
mod encoder;
mod error;
mod mapping;
mod pipeline;
mod redaction;
mod slog;
mod stream;

// Re-exports
pub use allocator::{PlaceholderAllocator, TOKEN_DIGITS};
pub use category::{
    Category, Classification, CreditCard, EmailAddress, IpAddress, Person, PhoneNumber, UsSsn,
    DEFAULT_CATEGORIES,
};
pub use completion::{CompletionService, FragmentStream};
pub use decoder::{restore, Restorer};
#[cfg(feature = "patterns")]
pub use detector::PatternDetector;
pub use detector::{EntityDetector, EntitySpan};
pub use encoder::{redact, Redacted};
pub use error::{BoxError, Error, Result};
pub use mapping::Mapping;
pub use pipeline::{
    ChatRequest, ProcessedRequest, ProcessorConfig, Pseudonymizer, RequestProcessor,
    ResponseStream,
};
pub use stream::StreamingDecoder;
#[doc(hidden)]
pub use redaction::{Classifiable, RedactionMapper, SensitiveType};
