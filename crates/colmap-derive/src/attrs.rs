//! Attribute parsing for the Record derive macro.
//!
//! Fields take a single string: `#[colmap("name,readonly")]`. The string is
//! passed through to the runtime unchanged; only the parts that decide which
//! accessors to generate are looked at here.

use syn::{Field, LitStr, Result, Visibility};

/// Annotation value excluding a field.
const SKIP: &str = "-";

/// What the macro needs to know about one field.
pub(crate) struct FieldAttr {
    /// Raw annotation text, empty when the field has no `#[colmap]`.
    pub annotation: String,
    /// Whether the field is visible outside its module.
    pub exported: bool,
}

impl FieldAttr {
    pub(crate) fn from_field(field: &Field) -> Result<Self> {
        let mut annotation: Option<LitStr> = None;
        for attr in &field.attrs {
            if !attr.path().is_ident("colmap") {
                continue;
            }
            if annotation.is_some() {
                return Err(syn::Error::new_spanned(
                    attr,
                    "duplicate #[colmap(...)] attribute",
                ));
            }
            annotation = Some(attr.parse_args::<LitStr>().map_err(|e| {
                syn::Error::new(
                    e.span(),
                    "expected #[colmap(\"column\")] or #[colmap(\"column,readonly\")]",
                )
            })?);
        }

        Ok(FieldAttr {
            annotation: annotation.map(|lit| lit.value()).unwrap_or_default(),
            exported: is_exported(&field.vis),
        })
    }

    /// Whether the runtime can ever map this field to a column.
    ///
    /// Unusable fields get no accessors, so their types need not be bindable.
    pub(crate) fn is_usable(&self) -> bool {
        self.exported && self.annotation.split(',').next() != Some(SKIP)
    }
}

/// `pub(self)` and `pub(in self)` are as private as no visibility at all.
fn is_exported(vis: &Visibility) -> bool {
    match vis {
        Visibility::Inherited => false,
        Visibility::Restricted(restricted) => !restricted.path.is_ident("self"),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn first_field(input: syn::DeriveInput) -> Field {
        match input.data {
            syn::Data::Struct(data) => data.fields.into_iter().next().unwrap(),
            _ => unreachable!(),
        }
    }

    #[test]
    fn reads_annotation_and_visibility() {
        let field = first_field(parse_quote! {
            struct S { #[colmap("hage,readonly")] pub age: i32 }
        });
        let attr = FieldAttr::from_field(&field).unwrap();
        assert_eq!(attr.annotation, "hage,readonly");
        assert!(attr.exported);
        assert!(attr.is_usable());
    }

    #[test]
    fn missing_annotation_is_empty() {
        let field = first_field(parse_quote! { struct S { pub(crate) age: i32 } });
        let attr = FieldAttr::from_field(&field).unwrap();
        assert_eq!(attr.annotation, "");
        assert!(attr.exported);
    }

    #[test]
    fn skipped_and_private_fields_are_unusable() {
        let field = first_field(parse_quote! { struct S { #[colmap("-")] pub age: i32 } });
        assert!(!FieldAttr::from_field(&field).unwrap().is_usable());

        let field = first_field(parse_quote! { struct S { age: i32 } });
        let attr = FieldAttr::from_field(&field).unwrap();
        assert!(!attr.exported);
        assert!(!attr.is_usable());

        // "-" only excludes as the first segment.
        let field = first_field(parse_quote! { struct S { #[colmap("age,-")] pub age: i32 } });
        assert!(FieldAttr::from_field(&field).unwrap().is_usable());
    }

    #[test]
    fn self_restricted_fields_are_private() {
        let field = first_field(parse_quote! { struct S { pub(self) age: i32 } });
        let attr = FieldAttr::from_field(&field).unwrap();
        assert!(!attr.exported);
        assert!(!attr.is_usable());

        let field = first_field(parse_quote! { struct S { pub(in self) age: i32 } });
        assert!(!FieldAttr::from_field(&field).unwrap().exported);

        for field in [
            first_field(parse_quote! { struct S { pub(super) age: i32 } }),
            first_field(parse_quote! { struct S { pub(in crate::zoo) age: i32 } }),
        ] {
            assert!(FieldAttr::from_field(&field).unwrap().exported);
        }
    }

    #[test]
    fn rejects_non_string_and_duplicate_attributes() {
        let field = first_field(parse_quote! { struct S { #[colmap(readonly)] pub age: i32 } });
        assert!(FieldAttr::from_field(&field).is_err());

        let field = first_field(parse_quote! {
            struct S { #[colmap("a")] #[colmap("b")] pub age: i32 }
        });
        assert!(FieldAttr::from_field(&field).is_err());
    }
}
