//! `Pseudonymize` for enums: one match arm per variant.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{ext::IdentExt, DataEnum, Generics, Result};

use crate::{
    fields::{expand_fields, ExpandedFields},
    generics::Bounds,
    DeriveOutput,
};

pub(crate) fn derive_enum(
    data: DataEnum,
    generics: &Generics,
    root: &TokenStream,
) -> Result<DeriveOutput> {
    let mut bounds = Bounds::default();
    let mut redaction_arms = Vec::new();
    let mut debug_redacted_arms = Vec::new();
    let mut debug_unredacted_arms = Vec::new();

    for variant in data.variants {
        let variant_ident = variant.ident;
        let ExpandedFields {
            pattern,
            transforms,
            debug_redacted,
            debug_unredacted,
        } = expand_fields(
            variant.fields,
            &variant_ident.unraw().to_string(),
            generics,
            root,
            &mut bounds,
        )?;

        redaction_arms.push(quote! {
            Self::#variant_ident #pattern => {
                #(#transforms)*
                Self::#variant_ident #pattern
            }
        });
        debug_redacted_arms.push(quote! { Self::#variant_ident #pattern => #debug_redacted });
        debug_unredacted_arms.push(quote! { Self::#variant_ident #pattern => #debug_unredacted });
    }

    Ok(DeriveOutput {
        redaction_body: quote! {
            ::core::result::Result::Ok(match self {
                #(#redaction_arms),*
            })
        },
        debug_redacted_body: quote! {
            match self {
                #(#debug_redacted_arms),*
            }
        },
        debug_unredacted_body: quote! {
            match self {
                #(#debug_unredacted_arms),*
            }
        },
        bounds,
    })
}
