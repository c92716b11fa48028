//! Derive macro for `tokenmask`.
//!
//! This crate generates the traversal code behind `#[derive(Pseudonymize)]`. It:
//! - reads `#[sensitive]` and `#[sensitive(Classification)]` field attributes
//! - emits a `SensitiveType` implementation that hands each marked field to a
//!   `RedactionMapper`
//! - emits a `Debug` implementation that hides marked fields
//!
//! Detection, token allocation and mapping all live in the main `tokenmask`
//! crate and happen at runtime.

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
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::unwrap_used))]

#[allow(unused_extern_crates)]
extern crate proc_macro;

use proc_macro2::TokenStream;
use proc_macro_crate::{crate_name, FoundCrate};
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Result};

mod container;
mod derive_enum;
mod derive_struct;
mod fields;
mod generics;
mod strategy;
mod types;

use container::{parse_container_options, ContainerOptions};
use derive_enum::derive_enum;
use derive_struct::derive_struct;
use generics::Bounds;

/// Derives `tokenmask::SensitiveType` and a redacting `Debug` for structs and
/// enums.
///
/// # Container Attributes
///
/// - `#[sensitive(skip_debug)]` - Do not generate `Debug`. Use this when the
///   type needs its own `Debug` implementation.
///
/// # Field Attributes
///
/// - **No annotation**: the field passes through unchanged. Any type works,
///   including types from other crates.
///
/// - `#[sensitive]`: the field is walked. Strings are run through the entity
///   detector and every entity found is replaced with a token. `Option`,
///   `Vec`, `Box`, maps and nested types deriving `Pseudonymize` are walked
///   recursively.
///
/// - `#[sensitive(Classification)]`: the whole value becomes a single token of
///   the classification's category, without consulting the detector. Works
///   for `String`, `Cow<str>` and `Option`, `Vec` or `Box` of those.
///
/// Scalar fields (`i32`, `bool`, `char`, ...) cannot carry a token and are
/// rejected under either form. Unions are rejected.
///
/// Fields are visited in declaration order, so tokens are allocated in that
/// order too.
///
/// # Generated `Debug`
///
/// Unless building with `cfg(any(test, feature = "testing"))`, annotated
/// fields print as `"[REDACTED]"`.
#[proc_macro_derive(Pseudonymize, attributes(sensitive))]
pub fn derive_pseudonymize(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Path to the `tokenmask` crate root as seen from the deriving crate.
///
/// Handles renamed dependencies. `tokenmask` declares
/// `extern crate self as tokenmask`, so the absolute path also resolves inside
/// the crate itself, its unit tests and its doctests.
pub(crate) fn crate_root() -> TokenStream {
    match crate_name("tokenmask") {
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote! { ::#ident }
        }
        Ok(FoundCrate::Itself) | Err(_) => quote! { ::tokenmask },
    }
}

/// Generated pieces shared by struct and enum derivation.
pub(crate) struct DeriveOutput {
    pub(crate) redaction_body: TokenStream,
    pub(crate) debug_redacted_body: TokenStream,
    pub(crate) debug_unredacted_body: TokenStream,
    pub(crate) bounds: Bounds,
}

fn expand(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        attrs,
        ..
    } = input;

    let ContainerOptions { skip_debug } = parse_container_options(&attrs)?;
    let root = crate_root();

    let output = match data {
        Data::Struct(data) => derive_struct(&ident, data, &generics, &root)?,
        Data::Enum(data) => derive_enum(data, &generics, &root)?,
        Data::Union(u) => {
            return Err(syn::Error::new_spanned(
                u.union_token,
                "`Pseudonymize` cannot be derived for unions",
            ));
        }
    };
    let DeriveOutput {
        redaction_body,
        debug_redacted_body,
        debug_unredacted_body,
        bounds,
    } = output;

    let redact_generics = bounds.redaction_generics(&generics, &root);
    let (impl_generics, ty_generics, where_clause) = redact_generics.split_for_impl();

    let debug_impl = if skip_debug {
        quote! {}
    } else {
        let redacted = bounds.debug_generics(&generics, true);
        let unredacted = bounds.debug_generics(&generics, false);
        let (r_impl, r_ty, r_where) = redacted.split_for_impl();
        let (u_impl, u_ty, u_where) = unredacted.split_for_impl();
        quote! {
            #[cfg(any(test, feature = "testing"))]
            impl #u_impl ::core::fmt::Debug for #ident #u_ty #u_where {
                fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    #debug_unredacted_body
                }
            }

            #[cfg(not(any(test, feature = "testing")))]
            #[allow(unused_variables)]
            impl #r_impl ::core::fmt::Debug for #ident #r_ty #r_where {
                fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    #debug_redacted_body
                }
            }
        }
    };

    Ok(quote! {
        impl #impl_generics #root::SensitiveType for #ident #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn redact_with<__TokenmaskMapper: #root::RedactionMapper>(
                self,
                mapper: &mut __TokenmaskMapper,
            ) -> ::core::result::Result<Self, #root::Error> {
                #redaction_body
            }
        }

        #debug_impl
    })
}
