use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;
use syn::{Data, DeriveInput, Fields, FieldsNamed, LitStr};

/// Path to the crossdao facade crate as seen from the expansion site.
pub(crate) fn krate() -> TokenStream {
    match proc_macro_crate::crate_name("crossdao") {
        Ok(proc_macro_crate::FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        // `Itself` happens in crossdao's own integration tests, where the
        // crate is still reachable as `::crossdao`.
        _ => quote!(::crossdao),
    }
}

/// The named fields of a plain struct; anything else is rejected.
pub(crate) fn named_fields<'a>(
    input: &'a DeriveInput,
    derive: &str,
) -> syn::Result<&'a FieldsNamed> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            format!("#[derive({derive})] does not support generic types"),
        ));
    }
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(fields),
            other => Err(syn::Error::new_spanned(
                other,
                format!("#[derive({derive})] requires named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            &input.ident,
            format!("#[derive({derive})] only applies to structs"),
        )),
    }
}

/// Parses a `naming = "..."` literal into a `Naming` constructor expression.
pub(crate) fn naming_tokens(krate: &TokenStream, lit: &LitStr) -> syn::Result<TokenStream> {
    let style = match lit.value().as_str() {
        "upper_snake" => quote!(UpperSnake),
        "snake" => quote!(Snake),
        "preserve" => quote!(Preserve),
        other => {
            return Err(syn::Error::new_spanned(
                lit,
                format!("unknown naming convention `{other}` (expected upper_snake, snake or preserve)"),
            ));
        }
    };
    Ok(quote!(#krate::Naming::uniform(#krate::CaseStyle::#style)))
}
