//! Code generation for one set of fields: a struct body or an enum variant.
//!
//! Every field is bound to `field_N` when destructuring, whatever its name,
//! so generated code never collides with user field names.

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote, quote_spanned};
use syn::{ext::IdentExt, spanned::Spanned, Fields, Generics, LitStr, Result};

use crate::{
    generics::Bounds,
    strategy::{parse_field_strategy, Strategy},
    types::is_scalar_type,
};

pub(crate) struct ExpandedFields {
    /// Destructuring pattern, also valid as a constructor: `{ a: field_0 }`,
    /// `(field_0)` or nothing for unit shapes.
    pub(crate) pattern: TokenStream,
    /// One `let` rebinding per marked field, in declaration order.
    pub(crate) transforms: Vec<TokenStream>,
    pub(crate) debug_redacted: TokenStream,
    pub(crate) debug_unredacted: TokenStream,
}

pub(crate) fn expand_fields(
    fields: Fields,
    label: &str,
    generics: &Generics,
    root: &TokenStream,
    bounds: &mut Bounds,
) -> Result<ExpandedFields> {
    let label = LitStr::new(label, Span::call_site());
    let named = matches!(fields, Fields::Named(_));
    let unit = matches!(fields, Fields::Unit);

    let mut elems = Vec::new();
    let mut transforms = Vec::new();
    let mut redacted_entries = Vec::new();
    let mut unredacted_entries = Vec::new();

    for (index, field) in fields.into_iter().enumerate() {
        let binding = format_ident!("field_{index}");
        let strategy = parse_field_strategy(&field.attrs)?;
        let span = field.span();

        if let Some(transform) = field_transform(&field.ty, &binding, &strategy, root)? {
            transforms.push(transform);
        }
        bounds.record(&field.ty, generics, &strategy);

        let shown = if strategy.is_sensitive() {
            quote! { &"[REDACTED]" }
        } else {
            quote! { #binding }
        };
        match &field.ident {
            Some(ident) => {
                let name = LitStr::new(&ident.unraw().to_string(), ident.span());
                elems.push(quote! { #ident: #binding });
                redacted_entries.push(quote_spanned! { span => debug.field(#name, #shown); });
                unredacted_entries.push(quote_spanned! { span => debug.field(#name, #binding); });
            }
            None => {
                elems.push(quote! { #binding });
                redacted_entries.push(quote_spanned! { span => debug.field(#shown); });
                unredacted_entries.push(quote_spanned! { span => debug.field(#binding); });
            }
        }
    }

    let (pattern, debug_redacted, debug_unredacted) = if unit {
        let body = quote! { f.write_str(#label) };
        (quote! {}, body.clone(), body)
    } else if named {
        (
            quote! { { #(#elems),* } },
            quote! {{
                let mut debug = f.debug_struct(#label);
                #(#redacted_entries)*
                debug.finish()
            }},
            quote! {{
                let mut debug = f.debug_struct(#label);
                #(#unredacted_entries)*
                debug.finish()
            }},
        )
    } else {
        (
            quote! { ( #(#elems),* ) },
            quote! {{
                let mut debug = f.debug_tuple(#label);
                #(#redacted_entries)*
                debug.finish()
            }},
            quote! {{
                let mut debug = f.debug_tuple(#label);
                #(#unredacted_entries)*
                debug.finish()
            }},
        )
    };

    Ok(ExpandedFields {
        pattern,
        transforms,
        debug_redacted,
        debug_unredacted,
    })
}

/// The rebinding that redacts one field, or `None` for a pass-through field.
fn field_transform(
    ty: &syn::Type,
    binding: &syn::Ident,
    strategy: &Strategy,
    root: &TokenStream,
) -> Result<Option<TokenStream>> {
    if strategy.is_sensitive() && is_scalar_type(ty) {
        return Err(syn::Error::new_spanned(
            ty,
            "scalar fields cannot hold a placeholder token; remove #[sensitive] \
             or store the value as a String",
        ));
    }
    let span = ty.span();
    Ok(match strategy {
        Strategy::PassThrough => None,
        Strategy::Walk => Some(quote_spanned! { span =>
            let #binding = <#ty as #root::SensitiveType>::redact_with(#binding, mapper)?;
        }),
        Strategy::Classify(classification) => Some(quote_spanned! { span =>
            let #binding = <#ty as #root::Classifiable>::apply_classification::<#classification, _>(
                #binding, mapper,
            )?;
        }),
    })
}
