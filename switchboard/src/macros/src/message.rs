use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, Type, parse_macro_input};

pub fn derive_event(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    // `::switchboard` resolves inside the crate through `extern crate self as switchboard;`.
    TokenStream::from(quote! {
        impl #impl_generics ::switchboard::Event for #name #ty_generics #where_clause {
        }
    })
}

pub fn derive_request(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let reply = match declared_reply(&ast) {
        Ok(reply) => reply,
        Err(err) => return err.to_compile_error().into(),
    };

    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    TokenStream::from(quote! {
        impl #impl_generics ::switchboard::Request for #name #ty_generics #where_clause {
            type Reply = #reply;
        }
    })
}

/// The type named by `#[reply(T)]`, or `()` when the attribute is missing.
fn declared_reply(ast: &DeriveInput) -> syn::Result<Type> {
    let mut found: Option<Type> = None;
    for attr in ast.attrs.iter().filter(|attr| attr.path().is_ident("reply")) {
        if found.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate #[reply(...)] attribute"));
        }
        found = Some(attr.parse_args::<Type>()?);
    }
    Ok(found.unwrap_or_else(|| syn::parse_quote!(())))
}
