use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{ToTokens, quote};
use syn::{DeriveInput, Token, Type, parse::Parser, parse_macro_input, punctuated::Punctuated};

/// Widest tuple the runtime implements the set traits for. Longer lists are nested.
const MAX_ARITY: usize = 16;

pub fn derive_subscriber(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match expand_subscriber(&ast) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

pub fn assert_unique_types(input: TokenStream) -> TokenStream {
    let parser = Punctuated::<Type, Token![,]>::parse_terminated;
    let types = match parser.parse(input) {
        Ok(types) => types.into_iter().collect::<Vec<_>>(),
        Err(err) => return err.to_compile_error().into(),
    };

    match check_unique(&types, "type list") {
        Ok(()) => quote!(const _: () = ();).into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_subscriber(ast: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let events = declared(ast, "events")?;
    let requests = declared(ast, "requests")?;

    if events.is_none() && requests.is_none() {
        return Err(syn::Error::new_spanned(
            &ast.ident,
            "Subscriber needs #[events(...)], #[requests(...)], or both",
        ));
    }

    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let mut tokens = proc_macro2::TokenStream::new();

    if let Some(events) = events {
        check_unique(&events, "#[events]")?;
        let set = set_type(&events)?;
        let markers = events.iter().map(|ty| {
            quote! {
                impl #impl_generics ::switchboard::DeclaresEvent<#ty> for #name #ty_generics #where_clause {}
            }
        });
        tokens.extend(quote! {
            impl #impl_generics ::switchboard::EventSubscriber for #name #ty_generics #where_clause {
                type Events = #set;
            }

            #(#markers)*
        });
    }

    if let Some(requests) = requests {
        check_unique(&requests, "#[requests]")?;
        let set = set_type(&requests)?;
        let markers = requests.iter().map(|ty| {
            quote! {
                impl #impl_generics ::switchboard::DeclaresRequest<#ty> for #name #ty_generics #where_clause {}
            }
        });
        tokens.extend(quote! {
            impl #impl_generics ::switchboard::RequestSubscriber for #name #ty_generics #where_clause {
                type Requests = #set;
            }

            #(#markers)*
        });
    }

    Ok(tokens)
}

/// Collects the types of every `#[name(...)]` attribute, in order. `None` if there is no such
/// attribute at all.
fn declared(ast: &DeriveInput, name: &str) -> syn::Result<Option<Vec<Type>>> {
    let mut found: Option<Vec<Type>> = None;
    for attr in ast.attrs.iter().filter(|attr| attr.path().is_ident(name)) {
        let types = attr.parse_args_with(Punctuated::<Type, Token![,]>::parse_terminated)?;
        found.get_or_insert_with(Vec::new).extend(types);
    }
    Ok(found)
}

fn check_unique(types: &[Type], what: &str) -> syn::Result<()> {
    let mut seen: Vec<String> = Vec::with_capacity(types.len());
    for ty in types {
        let key = spelling(ty);
        if seen.contains(&key) {
            return Err(syn::Error::new_spanned(
                ty,
                format!("duplicate type `{key}` in {what} declaration"),
            ));
        }
        seen.push(key);
    }
    Ok(())
}

fn spelling(ty: &Type) -> String {
    ty.to_token_stream()
        .to_string()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// `()` for no types, a flat tuple up to [`MAX_ARITY`], and a tuple of tuples past that.
fn set_type(types: &[Type]) -> syn::Result<proc_macro2::TokenStream> {
    if types.is_empty() {
        return Ok(quote!(()));
    }
    if types.len() <= MAX_ARITY {
        return Ok(quote!((#(#types,)*)));
    }
    if types.len() > MAX_ARITY * MAX_ARITY {
        return Err(syn::Error::new(
            Span::call_site(),
            format!("at most {} types can be declared", MAX_ARITY * MAX_ARITY),
        ));
    }

    let groups = types.chunks(MAX_ARITY).map(|chunk| quote!((#(#chunk,)*)));
    Ok(quote!((#(#groups,)*)))
}
