//! `Pseudonymize` for structs.

use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::{ext::IdentExt, DataStruct, Generics, Result};

use crate::{
    fields::{expand_fields, ExpandedFields},
    generics::Bounds,
    DeriveOutput,
};

pub(crate) fn derive_struct(
    name: &Ident,
    data: DataStruct,
    generics: &Generics,
    root: &TokenStream,
) -> Result<DeriveOutput> {
    let mut bounds = Bounds::default();
    let ExpandedFields {
        pattern,
        transforms,
        debug_redacted,
        debug_unredacted,
    } = expand_fields(
        data.fields,
        &name.unraw().to_string(),
        generics,
        root,
        &mut bounds,
    )?;

    Ok(DeriveOutput {
        redaction_body: quote! {
            let Self #pattern = self;
            #(#transforms)*
            ::core::result::Result::Ok(Self #pattern)
        },
        debug_redacted_body: quote! {
            match self {
                Self #pattern => #debug_redacted,
            }
        },
        debug_unredacted_body: quote! {
            match self {
                Self #pattern => #debug_unredacted,
            }
        },
        bounds,
    })
}
