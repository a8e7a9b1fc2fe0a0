use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

/// Derives `Display` and `FromStr` for a unit-only enum through its serde
/// names. Parsing ignores surrounding whitespace and ASCII case, so `" ON "`
/// reads the same as `"on"`.
#[proc_macro_derive(Str)]
pub fn str_macro_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let name = &ast.ident;

    let Data::Enum(data) = &ast.data else {
        return quote! { compile_error!("Str supports only enums"); }.into();
    };

    if data
        .variants
        .iter()
        .any(|variant| !matches!(variant.fields, Fields::Unit))
    {
        return quote! { compile_error!("Str supports only unit variants"); }.into();
    }

    let gen = quote! {
        impl std::fmt::Display for #name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.serialize(f)
            }
        }

        impl std::str::FromStr for #name {
            type Err = serde::de::value::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                use serde::de::IntoDeserializer;

                let normalized = s.trim().to_ascii_lowercase();
                Self::deserialize(normalized.as_str().into_deserializer())
            }
        }
    };

    gen.into()
}
