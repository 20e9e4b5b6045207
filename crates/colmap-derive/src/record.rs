//! Record derive macro implementation

use proc_macro2::{TokenStream, TokenTree};
use quote::quote;
use syn::{Data, DeriveInput, Fields, GenericParam, Ident, Result, Type};

use crate::attrs::FieldAttr;

pub fn expand(mut input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Record can only be derived for structs with named fields",
            ));
        }
    };

    if let Some(lt) = input.generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lt,
            "Record cannot be derived for types with lifetime parameters",
        ));
    }

    let type_params: Vec<Ident> = input
        .generics
        .type_params()
        .map(|param| param.ident.clone())
        .collect();

    let mut field_defs = Vec::with_capacity(fields.len());
    let mut value_arms = Vec::with_capacity(fields.len());
    let mut scan_targets = Vec::with_capacity(fields.len());
    let mut generic_field_types: Vec<&Type> = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let field_ident = field.ident.as_ref().unwrap();
        let field_name = field_ident.to_string();
        let field_name = field_name.strip_prefix("r#").unwrap_or(&field_name).to_string();
        let ty = &field.ty;
        let kind = quote!(#ty).to_string();
        let attr = FieldAttr::from_field(field)?;
        let exported = attr.exported;
        let annotation = &attr.annotation;

        field_defs.push(quote! {
            ::colmap::FieldDef::new(#field_name, #kind, #exported, #annotation)
        });

        if attr.is_usable() {
            if mentions_any(quote!(#ty), &type_params) {
                generic_field_types.push(ty);
            }
            value_arms.push(quote! {
                #index => ::core::option::Option::Some(&self.#field_ident as &dyn ::colmap::SqlValue),
            });
            scan_targets.push(quote! {
                ::core::option::Option::Some(&mut self.#field_ident as &mut dyn ::colmap::ScanTarget)
            });
        } else {
            scan_targets.push(quote! { ::core::option::Option::None });
        }
    }

    let type_name = name.to_string();
    let struct_ident = name.clone();

    for param in input.generics.params.iter_mut() {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(syn::parse_quote!('static));
        }
    }
    if !generic_field_types.is_empty() {
        let where_clause = input.generics.make_where_clause();
        for ty in generic_field_types {
            where_clause
                .predicates
                .push(syn::parse_quote!(#ty: ::colmap::SqlValue + ::colmap::ScanTarget));
        }
    }
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::colmap::Record for #struct_ident #ty_generics #where_clause {
            fn type_name() -> &'static str {
                #type_name
            }

            fn field_defs() -> &'static [::colmap::FieldDef] {
                const FIELDS: &[::colmap::FieldDef] = &[#(#field_defs),*];
                FIELDS
            }

            #[allow(unreachable_patterns)]
            fn field_value(&self, index: usize) -> ::core::option::Option<&dyn ::colmap::SqlValue> {
                match index {
                    #(#value_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn scan_targets(
                &mut self,
            ) -> ::std::vec::Vec<::core::option::Option<&mut dyn ::colmap::ScanTarget>> {
                ::std::vec![#(#scan_targets),*]
            }
        }
    })
}

/// Whether `tokens` names any of `idents`, at any nesting depth.
fn mentions_any(tokens: TokenStream, idents: &[Ident]) -> bool {
    tokens.into_iter().any(|tt| match tt {
        TokenTree::Ident(ident) => idents.contains(&ident),
        TokenTree::Group(group) => mentions_any(group.stream(), idents),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn rejects_non_structs() {
        let input: DeriveInput = parse_quote! { enum E { A, B } };
        let err = expand(input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Record can only be derived for structs with named fields"
        );

        let input: DeriveInput = parse_quote! { struct T(pub i32); };
        assert!(expand(input).is_err());
    }

    #[test]
    fn rejects_lifetimes() {
        let input: DeriveInput = parse_quote! { struct B<'a> { pub name: &'a str } };
        assert!(expand(input).is_err());
    }

    #[test]
    fn bounds_generic_field_types() {
        let input: DeriveInput = parse_quote! {
            pub struct Wrapper<T, U> {
                pub inner: T,
                pub many: Option<Vec<T>>,
                pub label: String,
                #[colmap("-")]
                pub skipped: U,
            }
        };
        let out = expand(input).unwrap().to_string();
        assert!(out.contains("T : 'static"));
        assert!(out.contains("T : :: colmap :: SqlValue + :: colmap :: ScanTarget"));
        assert!(out.contains(
            "Option < Vec < T > > : :: colmap :: SqlValue + :: colmap :: ScanTarget"
        ));
        // Excluded and concrete fields add no bounds.
        assert!(!out.contains("U : :: colmap :: SqlValue"));
        assert!(!out.contains("String : :: colmap :: SqlValue"));
    }

    #[test]
    fn emits_field_table_in_declaration_order() {
        let input: DeriveInput = parse_quote! {
            struct Zoo {
                pub platypus: String,
                #[colmap("-")]
                pub hidden: Vec<Box<dyn std::any::Any>>,
                secret: i64,
                #[colmap("rhino,readonly")]
                pub rhinoceros: f64,
            }
        };
        let out = expand(input).unwrap().to_string();
        let platypus = out.find("\"platypus\"").unwrap();
        let hidden = out.find("\"hidden\"").unwrap();
        let secret = out.find("\"secret\"").unwrap();
        let rhino = out.find("\"rhinoceros\"").unwrap();
        assert!(platypus < hidden && hidden < secret && secret < rhino);
        assert!(out.contains("\"rhino,readonly\""));
        // Unusable fields get no accessors.
        assert!(!out.contains("self . hidden"));
        assert!(!out.contains("self . secret"));
        assert!(out.contains("self . platypus"));
    }
}
