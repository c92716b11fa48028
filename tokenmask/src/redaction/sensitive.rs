//! Domain layer: types that contain text to be scanned for entities.
//!
//! ## Field Handling
//!
//! The derive macro generates different code based on field annotations:
//!
//! | Annotation | Generated Code | Behavior |
//! |------------|----------------|----------|
//! | None | Pass through | Field unchanged (external types work!) |
//! | `#[sensitive]` | `SensitiveType::redact_with` | Scan strings, walk everything else |
//! | `#[sensitive(Class)]` | `Classifiable::apply_classification` | Whole value becomes one token |
//!
//! ## Container Implementations
//!
//! `SensitiveType` is implemented for `String`, `Cow<str>` and the common std
//! containers (`Option`, `Result`, `Vec`, `Box`, maps). Strings are the leaves:
//! they are handed to the mapper's detector. Map keys are never scanned.
//!
//! Scalars have no implementation. A number cannot hold a token, so marking
//! one `#[sensitive]` is a compile error rather than a silent no-op.

use std::{
    borrow::Cow,
    collections::{BTreeMap, HashMap},
    hash::Hash,
};

use super::redact::RedactionMapper;
use crate::error::Result;

/// A value that can be walked for sensitive text.
///
/// Implemented by types that derive `Pseudonymize`. Walking consumes the
/// value and returns a copy where every scanned string carries tokens in
/// place of its entities.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `SensitiveType`",
    label = "this type cannot be walked for sensitive text",
    note = "use `#[derive(Pseudonymize)]` on the type definition",
    note = "or use `#[sensitive(Classification)]` to replace a string value as a whole"
)]
#[doc(hidden)]
pub trait SensitiveType: Sized {
    /// Redacts this value through `mapper`.
    fn redact_with<M: RedactionMapper>(self, mapper: &mut M) -> Result<Self>;
}

impl SensitiveType for String {
    fn redact_with<M: RedactionMapper>(self, mapper: &mut M) -> Result<Self> {
        mapper.map_text(self)
    }
}

impl SensitiveType for Cow<'_, str> {
    fn redact_with<M: RedactionMapper>(self, mapper: &mut M) -> Result<Self> {
        mapper.map_text(self.into_owned()).map(Cow::Owned)
    }
}

impl<T> SensitiveType for Option<T>
where
    T: SensitiveType,
{
    fn redact_with<M: RedactionMapper>(self, mapper: &mut M) -> Result<Self> {
        self.map(|value| value.redact_with(mapper)).transpose()
    }
}

impl<T, E> SensitiveType for std::result::Result<T, E>
where
    T: SensitiveType,
    E: SensitiveType,
{
    fn redact_with<M: RedactionMapper>(self, mapper: &mut M) -> Result<Self> {
        Ok(match self {
            Ok(value) => Ok(value.redact_with(mapper)?),
            Err(err) => Err(err.redact_with(mapper)?),
        })
    }
}

impl<T> SensitiveType for Vec<T>
where
    T: SensitiveType,
{
    fn redact_with<M: RedactionMapper>(self, mapper: &mut M) -> Result<Self> {
        self.into_iter()
            .map(|value| value.redact_with(mapper))
            .collect()
    }
}

impl<T> SensitiveType for Box<T>
where
    T: SensitiveType,
{
    fn redact_with<M: RedactionMapper>(self, mapper: &mut M) -> Result<Self> {
        (*self).redact_with(mapper).map(Box::new)
    }
}

impl<K, V, S> SensitiveType for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: SensitiveType,
    S: std::hash::BuildHasher + Clone,
{
    fn redact_with<M: RedactionMapper>(self, mapper: &mut M) -> Result<Self> {
        let mut result = HashMap::with_capacity_and_hasher(self.len(), self.hasher().clone());
        for (key, value) in self {
            result.insert(key, value.redact_with(mapper)?);
        }
        Ok(result)
    }
}

impl<K, V> SensitiveType for BTreeMap<K, V>
where
    K: Ord,
    V: SensitiveType,
{
    fn redact_with<M: RedactionMapper>(self, mapper: &mut M) -> Result<Self> {
        self.into_iter()
            .map(|(key, value)| Ok((key, value.redact_with(mapper)?)))
            .collect()
    }
}
