//! Parsing of `#[sensitive(...)]` field attributes.

use syn::{Attribute, Meta, Result};

/// What generated code does with one field.
///
/// | Attribute | Strategy | Behavior |
/// |-----------|----------|----------|
/// | None | `PassThrough` | Field moved through unchanged |
/// | `#[sensitive]` | `Walk` | Strings scanned, containers walked |
/// | `#[sensitive(Class)]` | `Classify(Class)` | Whole value becomes one token |
#[derive(Clone, Debug)]
pub(crate) enum Strategy {
    PassThrough,
    Walk,
    Classify(syn::Path),
}

impl Strategy {
    /// True if the field is hidden from redacted `Debug` output.
    pub(crate) fn is_sensitive(&self) -> bool {
        !matches!(self, Self::PassThrough)
    }
}

pub(crate) fn parse_field_strategy(attrs: &[Attribute]) -> Result<Strategy> {
    let mut strategy = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("sensitive")) {
        let next = match &attr.meta {
            Meta::Path(_) => Strategy::Walk,
            Meta::List(list) => {
                let path = syn::parse2::<syn::Path>(list.tokens.clone()).map_err(|_| {
                    syn::Error::new_spanned(
                        attr,
                        "expected a classification type (e.g., #[sensitive(EmailAddress)])",
                    )
                })?;
                if path.is_ident("skip_debug") {
                    return Err(syn::Error::new_spanned(
                        attr,
                        "`skip_debug` is a container option; place it on the struct or enum",
                    ));
                }
                Strategy::Classify(path)
            }
            Meta::NameValue(_) => {
                return Err(syn::Error::new_spanned(
                    attr,
                    "name-value syntax is not supported for #[sensitive]",
                ));
            }
        };
        if strategy.replace(next).is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "multiple #[sensitive] attributes specified on the same field",
            ));
        }
    }
    Ok(strategy.unwrap_or(Strategy::PassThrough))
}
