use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

pub fn derive_reply(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    // User types are plain values: wrapped in `Some` when handled, `None` when not.
    TokenStream::from(quote! {
        impl #impl_generics ::switchboard::Reply for #name #ty_generics #where_clause {
            type Output = ::core::option::Option<Self>;
            const KIND: ::switchboard::ReplyKind = ::switchboard::ReplyKind::Value;

            #[inline]
            fn into_output(self) -> ::core::option::Option<Self> {
                ::core::option::Option::Some(self)
            }

            #[inline]
            fn absent() -> ::core::option::Option<Self> {
                ::core::option::Option::None
            }
        }
    })
}

pub fn derive_no_subscriber(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let value = match no_subscriber_value(&ast) {
        Ok(value) => value,
        Err(err) => return err.to_compile_error().into(),
    };

    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    TokenStream::from(quote! {
        impl #impl_generics ::switchboard::NoSubscriber for #name #ty_generics #where_clause {
            fn no_subscriber() -> Self {
                #value
            }
        }
    })
}

/// A unit struct is its own value. An enum names its value with `#[no_subscriber]` on exactly one
/// unit variant.
fn no_subscriber_value(ast: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    match &ast.data {
        Data::Struct(data) if matches!(data.fields, Fields::Unit) => Ok(quote!(Self)),
        Data::Struct(_) => Err(syn::Error::new_spanned(
            &ast.ident,
            "NoSubscriber can only be derived for unit structs or enums with a #[no_subscriber] variant",
        )),
        Data::Enum(data) => {
            let mut marked = data
                .variants
                .iter()
                .filter(|variant| variant.attrs.iter().any(|attr| attr.path().is_ident("no_subscriber")));

            let Some(variant) = marked.next() else {
                return Err(syn::Error::new_spanned(
                    &ast.ident,
                    "mark one unit variant with #[no_subscriber]",
                ));
            };
            if let Some(extra) = marked.next() {
                return Err(syn::Error::new_spanned(
                    &extra.ident,
                    "only one variant may be marked #[no_subscriber]",
                ));
            }
            if !matches!(variant.fields, Fields::Unit) {
                return Err(syn::Error::new_spanned(
                    &variant.ident,
                    "the #[no_subscriber] variant must be a unit variant",
                ));
            }

            let ident = &variant.ident;
            Ok(quote!(Self::#ident))
        }
        Data::Union(_) => Err(syn::Error::new_spanned(
            &ast.ident,
            "NoSubscriber cannot be derived for unions",
        )),
    }
}
