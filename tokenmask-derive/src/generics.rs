//! Trait bounds for generic parameters.
//!
//! Bounds are added only for parameters that appear in fields needing them:
//! walked fields need `SensitiveType`, classified fields need `Classifiable`,
//! and printed fields need `Debug`. A parameter used only inside
//! `PhantomData` gets no bound, so marker parameters may be any type.

use proc_macro2::{Ident, TokenStream};
use syn::{parse_quote, Generics, TypeParamBound};

use crate::strategy::Strategy;

/// Generic parameters collected per required bound.
#[derive(Default)]
pub(crate) struct Bounds {
    walked: Vec<Ident>,
    classified: Vec<Ident>,
    debug_redacted: Vec<Ident>,
    debug_unredacted: Vec<Ident>,
}

impl Bounds {
    /// Records the parameters that `ty` needs bounded under `strategy`.
    pub(crate) fn record(&mut self, ty: &syn::Type, generics: &Generics, strategy: &Strategy) {
        collect_generics_from_type(ty, generics, &mut self.debug_unredacted);
        match strategy {
            Strategy::PassThrough => {
                collect_generics_from_type(ty, generics, &mut self.debug_redacted);
            }
            Strategy::Walk => collect_generics_from_type(ty, generics, &mut self.walked),
            Strategy::Classify(_) => {
                collect_generics_from_type(ty, generics, &mut self.classified);
            }
        }
    }

    /// Generics for the `SensitiveType` impl.
    pub(crate) fn redaction_generics(&self, generics: &Generics, root: &TokenStream) -> Generics {
        let generics = add_bound(
            generics.clone(),
            &self.walked,
            &parse_quote!(#root::SensitiveType),
        );
        add_bound(
            generics,
            &self.classified,
            &parse_quote!(#root::Classifiable),
        )
    }

    /// Generics for the redacted or the unredacted `Debug` impl.
    pub(crate) fn debug_generics(&self, generics: &Generics, redacted: bool) -> Generics {
        let params = if redacted {
            &self.debug_redacted
        } else {
            &self.debug_unredacted
        };
        add_bound(generics.clone(), params, &parse_quote!(::core::fmt::Debug))
    }
}

fn add_bound(mut generics: Generics, params: &[Ident], bound: &TypeParamBound) -> Generics {
    for param in generics.type_params_mut() {
        if params.contains(&param.ident) {
            param.bounds.push(bound.clone());
        }
    }
    generics
}

/// Pushes every type parameter of `generics` mentioned in `ty` onto `result`.
pub(crate) fn collect_generics_from_type(
    ty: &syn::Type,
    generics: &Generics,
    result: &mut Vec<Ident>,
) {
    match ty {
        syn::Type::Path(path) => {
            for segment in &path.path.segments {
                if segment.ident == "PhantomData" {
                    return;
                }
                if let Some(param) = generics
                    .type_params()
                    .find(|param| param.ident == segment.ident)
                {
                    if !result.contains(&param.ident) {
                        result.push(param.ident.clone());
                    }
                }
                if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                    for arg in &args.args {
                        if let syn::GenericArgument::Type(inner) = arg {
                            collect_generics_from_type(inner, generics, result);
                        }
                    }
                }
            }
        }
        syn::Type::Reference(reference) => {
            collect_generics_from_type(&reference.elem, generics, result);
        }
        syn::Type::Array(array) => collect_generics_from_type(&array.elem, generics, result),
        syn::Type::Slice(slice) => collect_generics_from_type(&slice.elem, generics, result),
        syn::Type::Paren(paren) => collect_generics_from_type(&paren.elem, generics, result),
        syn::Type::Group(group) => collect_generics_from_type(&group.elem, generics, result),
        syn::Type::Tuple(tuple) => {
            for elem in &tuple.elems {
                collect_generics_from_type(elem, generics, result);
            }
        }
        _ => {}
    }
}
