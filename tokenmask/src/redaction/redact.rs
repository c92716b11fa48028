//! Application layer: the mapper behind `#[derive(Pseudonymize)]`.
//!
//! A [`RedactionMapper`] owns the allocator and the growing mapping for one
//! redaction session. Generated code hands it every marked field in
//! declaration order.

use std::borrow::Cow;

use crate::{category::Classification, error::Result};

/// Turns sensitive text into tokenized text, recording what it replaced.
///
/// Implemented by the session mapper inside [`crate::Pseudonymizer`]; tests
/// may supply their own.
pub trait RedactionMapper {
    /// Runs `text` through the detector and replaces every entity found.
    fn map_text(&mut self, text: String) -> Result<String>;

    /// Replaces the whole of `value` with one token of `category`.
    ///
    /// Empty values are returned unchanged.
    fn map_entity(&mut self, category: &str, value: String) -> Result<String>;
}

/// Values that `#[sensitive(Classification)]` can tokenize as a whole.
///
/// Implemented for `String`, `Cow<str>` and for `Option`, `Vec` and `Box` of
/// any classifiable value, at any nesting depth.
#[doc(hidden)]
pub trait Classifiable: Sized {
    /// Replaces the value (or each contained value) with a token of `C`.
    fn apply_classification<C, M>(self, mapper: &mut M) -> Result<Self>
    where
        C: Classification,
        M: RedactionMapper;
}

impl Classifiable for String {
    fn apply_classification<C, M>(self, mapper: &mut M) -> Result<Self>
    where
        C: Classification,
        M: RedactionMapper,
    {
        mapper.map_entity(C::CATEGORY, self)
    }
}

impl Classifiable for Cow<'_, str> {
    fn apply_classification<C, M>(self, mapper: &mut M) -> Result<Self>
    where
        C: Classification,
        M: RedactionMapper,
    {
        mapper
            .map_entity(C::CATEGORY, self.into_owned())
            .map(Cow::Owned)
    }
}

impl<T> Classifiable for Option<T>
where
    T: Classifiable,
{
    fn apply_classification<C, M>(self, mapper: &mut M) -> Result<Self>
    where
        C: Classification,
        M: RedactionMapper,
    {
        self.map(|value| value.apply_classification::<C, M>(mapper))
            .transpose()
    }
}

impl<T> Classifiable for Vec<T>
where
    T: Classifiable,
{
    fn apply_classification<C, M>(self, mapper: &mut M) -> Result<Self>
    where
        C: Classification,
        M: RedactionMapper,
    {
        self.into_iter()
            .map(|value| value.apply_classification::<C, M>(mapper))
            .collect()
    }
}

impl<T> Classifiable for Box<T>
where
    T: Classifiable,
{
    fn apply_classification<C, M>(self, mapper: &mut M) -> Result<Self>
    where
        C: Classification,
        M: RedactionMapper,
    {
        (*self).apply_classification::<C, M>(mapper).map(Box::new)
    }
}
