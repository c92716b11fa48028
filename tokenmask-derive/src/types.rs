//! Type inspection helpers.

/// Returns true for bare primitive scalar names such as `i32`, `bool` or
/// `char`.
///
/// Qualified paths (`std::primitive::i32`), generic types and aliases are not
/// recognized; those fail later on the missing trait implementation instead.
pub(crate) fn is_scalar_type(ty: &syn::Type) -> bool {
    let syn::Type::Path(path) = ty else {
        return false;
    };
    if path.qself.is_some() || path.path.leading_colon.is_some() || path.path.segments.len() != 1 {
        return false;
    }
    let Some(segment) = path.path.segments.first() else {
        return false;
    };
    segment.arguments.is_empty()
        && matches!(
            segment.ident.to_string().as_str(),
            "i8" | "i16"
                | "i32"
                | "i64"
                | "i128"
                | "isize"
                | "u8"
                | "u16"
                | "u32"
                | "u64"
                | "u128"
                | "usize"
                | "f32"
                | "f64"
                | "bool"
                | "char"
        )
}
