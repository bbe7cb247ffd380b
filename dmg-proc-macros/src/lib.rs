extern crate proc_macro;

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::Data::Enum;
use syn::{DeriveInput, Ident};

/// Parse the derive input and collect the variant identifiers of a fieldless enum, or produce a
/// spanned error naming the offending derive.
fn fieldless_variants(ast: &DeriveInput, derive_name: &str) -> syn::Result<Vec<Ident>> {
    let name = &ast.ident;

    let Enum(data) = &ast.data else {
        return Err(syn::Error::new_spanned(
            name,
            format!("{derive_name} can only be derived for enums; {name} is not an enum"),
        ));
    };

    data.variants
        .iter()
        .map(|variant| {
            if variant.fields.is_empty() {
                Ok(variant.ident.clone())
            } else {
                Err(syn::Error::new_spanned(
                    variant,
                    format!(
                        "{derive_name} only supports fieldless variants; {name}::{} has fields",
                        variant.ident
                    ),
                ))
            }
        })
        .collect()
}

/// Implement `std::fmt::Display` for a fieldless enum by writing each variant's name verbatim.
/// Register and condition enums rely on this when rendering instruction mnemonics.
#[proc_macro_derive(EnumDisplay)]
pub fn enum_display(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = match syn::parse(input) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error().into(),
    };

    let variants = match fieldless_variants(&ast, "EnumDisplay") {
        Ok(variants) => variants,
        Err(err) => return err.to_compile_error().into(),
    };

    let name = &ast.ident;
    let variant_strs = variants.iter().map(ToString::to_string);

    let gen = quote! {
        impl std::fmt::Display for #name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let s = match self {
                    #(Self::#variants => #variant_strs,)*
                };
                f.write_str(s)
            }
        }
    };

    gen.into()
}

/// Implement `std::str::FromStr` for a fieldless enum with `Err = String`. Matching is
/// case-insensitive and ignores `-` and `_`, so `post-boot`, `post_boot` and `PostBoot` all parse.
#[proc_macro_derive(EnumFromStr)]
pub fn enum_from_str(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = match syn::parse(input) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error().into(),
    };

    let variants = match fieldless_variants(&ast, "EnumFromStr") {
        Ok(variants) => variants,
        Err(err) => return err.to_compile_error().into(),
    };

    let name = &ast.ident;
    let normalized: Vec<_> =
        variants.iter().map(|variant| variant.to_string().to_ascii_lowercase()).collect();
    let err_fmt_string = format!("invalid {name} string: '{{}}'");

    let gen = quote! {
        impl std::str::FromStr for #name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized: String = s
                    .chars()
                    .filter(|c| *c != '-' && *c != '_')
                    .map(|c| c.to_ascii_lowercase())
                    .collect();
                match normalized.as_str() {
                    #(#normalized => Ok(Self::#variants),)*
                    _ => Err(format!(#err_fmt_string, s)),
                }
            }
        }
    };

    gen.into()
}

/// Implement `serde::Serialize` by serializing the value's `Display` output as a string.
#[proc_macro_derive(StrSerialize)]
pub fn str_serialize(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = match syn::parse(input) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error().into(),
    };

    let ident = &ast.ident;

    let gen = quote! {
        impl serde::Serialize for #ident {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }
    };

    gen.into()
}

/// Implement `serde::Deserialize` by parsing a string through the type's `FromStr` impl.
#[proc_macro_derive(StrDeserialize)]
pub fn str_deserialize(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = match syn::parse(input) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error().into(),
    };

    let ident = &ast.ident;

    let visitor = format_ident!("__{}StrVisitor", ident);
    let expecting = format!("a string naming a {ident}");

    let gen = quote! {
        struct #visitor;

        impl<'de> serde::de::Visitor<'de> for #visitor {
            type Value = #ident;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str(#expecting)
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(serde::de::Error::custom)
            }
        }

        impl<'de> serde::Deserialize<'de> for #ident {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                deserializer.deserialize_str(#visitor)
            }
        }
    };

    gen.into()
}
