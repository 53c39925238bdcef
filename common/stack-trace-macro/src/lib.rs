//! `#[stack_trace_debug]`: derive a chained, location-aware `Debug` impl for
//! a `snafu`-based error enum.
//!
//! Applied above `#[derive(Snafu)]`, this macro generates:
//! - a `Debug` impl that renders the error's `Display` message for every
//!   variant, indented by nesting depth, followed by the `#[snafu(implicit)]`
//!   location (if the variant carries one) and the chained source error (if
//!   the variant carries a field named `source` whose type itself
//!   implements `relay_error::StackError`);
//! - a `relay_error::StackError` impl wiring up `location_opt`/`next` so the
//!   chain can be walked generically across crate boundaries.
//!
//! This mirrors the error-chain rendering used throughout the codebase's
//! error crates: top-level `Display` message first, full causal chain in
//! `{:?}`, concise message in `{}`.

use proc_macro::TokenStream;
use quote::quote;
use syn::Data;
use syn::DeriveInput;
use syn::Fields;
use syn::parse_macro_input;

#[proc_macro_attribute]
pub fn stack_trace_debug(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let enum_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(&input, "stack_trace_debug only supports enums")
            .to_compile_error()
            .into();
    };

    let mut location_arms = Vec::new();
    let mut next_arms = Vec::new();

    for variant in &data_enum.variants {
        let variant_name = &variant.ident;
        let has_location = has_named_field(&variant.fields, "location");
        let chainable_source = chainable_source_field(&variant.fields);

        location_arms.push(if has_location {
            quote! { Self::#variant_name { location, .. } => Some(*location), }
        } else {
            quote! { Self::#variant_name { .. } => None, }
        });

        next_arms.push(if chainable_source {
            quote! { Self::#variant_name { source, .. } => Some(source as &dyn ::relay_error::StackError), }
        } else {
            quote! { Self::#variant_name { .. } => None, }
        });
    }

    let expanded = quote! {
        impl #impl_generics ::relay_error::StackError for #enum_name #ty_generics #where_clause {
            fn location_opt(&self) -> ::std::option::Option<::snafu::Location> {
                match self {
                    #(#location_arms)*
                }
            }

            fn next(&self) -> ::std::option::Option<&dyn ::relay_error::StackError> {
                match self {
                    #(#next_arms)*
                }
            }
        }

        impl #impl_generics ::std::fmt::Debug for #enum_name #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::relay_error::write_error_chain(self, f)
            }
        }

        #input
    };

    expanded.into()
}

fn has_named_field(fields: &Fields, name: &str) -> bool {
    match fields {
        Fields::Named(named) => named
            .named
            .iter()
            .any(|f| f.ident.as_ref().is_some_and(|ident| ident == name)),
        _ => false,
    }
}

/// A `source` field chains into the stack-trace rendering only when its type
/// looks like one of our own domain error enums (by convention, a bare type
/// name ending in `Error`). Foreign error types (`std::io::Error`,
/// `reqwest::Error`, ...) still participate in the `snafu`/`std::error::Error`
/// source chain but are rendered through their own `Display`, not re-entered
/// as a `StackError`.
fn chainable_source_field(fields: &Fields) -> bool {
    let Fields::Named(named) = fields else {
        return false;
    };
    named.named.iter().any(|f| {
        f.ident.as_ref().is_some_and(|ident| ident == "source") && is_domain_error_type(&f.ty)
    })
}

fn is_domain_error_type(ty: &syn::Type) -> bool {
    let syn::Type::Path(type_path) = ty else {
        return false;
    };
    type_path
        .path
        .segments
        .last()
        .is_some_and(|seg| seg.ident.to_string().ends_with("Error"))
}
