//! Attributes on the deriving struct or enum itself.

use syn::{Attribute, Meta, Result};

/// Options parsed from container-level `#[sensitive(...)]` attributes.
#[derive(Clone, Debug, Default)]
pub(crate) struct ContainerOptions {
    /// Do not generate `Debug`.
    pub(crate) skip_debug: bool,
}

pub(crate) fn parse_container_options(attrs: &[Attribute]) -> Result<ContainerOptions> {
    let mut options = ContainerOptions::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("sensitive")) {
        match &attr.meta {
            Meta::List(list) => {
                list.parse_nested_meta(|meta| {
                    if meta.path.is_ident("skip_debug") {
                        options.skip_debug = true;
                        return Ok(());
                    }
                    let name = meta
                        .path
                        .get_ident()
                        .map_or_else(|| "?".to_string(), ToString::to_string);
                    Err(meta.error(format!(
                        "unknown container option `{name}`; expected `skip_debug`"
                    )))
                })?;
            }
            Meta::Path(path) => {
                return Err(syn::Error::new_spanned(
                    path,
                    "bare #[sensitive] belongs on fields; on a container only \
                     #[sensitive(skip_debug)] is accepted",
                ));
            }
            Meta::NameValue(nv) => {
                return Err(syn::Error::new_spanned(
                    nv,
                    "name-value syntax is not supported for #[sensitive]",
                ));
            }
        }
    }

    Ok(options)
}
