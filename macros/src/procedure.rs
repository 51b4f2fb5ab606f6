use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, LitStr};

use crate::util;

struct ProcedureAttrs {
    name: Option<LitStr>,
    schema: Option<LitStr>,
    catalog: Option<LitStr>,
    naming: Option<TokenStream>,
}

enum Binding {
    /// Input and/or output parameter.
    Param { input: bool, output: bool },
    /// Result-set field; the string is the binding name.
    ResultSet(String),
}

struct ProcedureField {
    ident: syn::Ident,
    binding: Binding,
}

pub(crate) fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let krate = util::krate();
    let ident = &input.ident;
    let type_name = ident.to_string();
    let attrs = parse_procedure_attrs(&input)?;

    let fields = util::named_fields(&input, "Procedure")?;
    let mut bound = Vec::new();
    for field in &fields.named {
        if let Some(parsed) = parse_field(field)? {
            bound.push(parsed);
        }
    }

    let builder = descriptor_builder(&krate, &type_name, &attrs, &bound);
    let to_params = to_params_body(&bound);
    let absorb = absorb_body(&krate, &bound);
    let input_count = bound
        .iter()
        .filter(|f| matches!(f.binding, Binding::Param { input: true, .. }))
        .count();

    Ok(quote! {
        #[automatically_derived]
        impl #krate::ProcedureEntity for #ident {
            fn descriptor() -> #krate::Result<#krate::ProcedureDescriptor> {
                #builder
            }

            fn to_params(&self) -> #krate::Params {
                let mut params = #krate::Params::with_capacity(#input_count);
                #to_params
                params
            }

            fn absorb(&mut self, output: &#krate::ProcedureOutput) -> #krate::Result<()> {
                #absorb
                Ok(())
            }
        }
    })
}

fn parse_procedure_attrs(input: &DeriveInput) -> syn::Result<ProcedureAttrs> {
    let krate = util::krate();
    let mut attrs = ProcedureAttrs {
        name: None,
        schema: None,
        catalog: None,
        naming: None,
    };
    for attr in &input.attrs {
        if !attr.path().is_ident("procedure") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                attrs.name = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("schema") {
                attrs.schema = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("catalog") {
                attrs.catalog = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("naming") {
                let lit: LitStr = meta.value()?.parse()?;
                attrs.naming = Some(util::naming_tokens(&krate, &lit)?);
            } else {
                return Err(meta.error("unknown #[procedure(...)] attribute"));
            }
            Ok(())
        })?;
    }
    Ok(attrs)
}

fn parse_field(field: &syn::Field) -> syn::Result<Option<ProcedureField>> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;

    let mut param: Option<(bool, bool)> = None;
    let mut result_set: Option<String> = None;
    for attr in &field.attrs {
        if attr.path().is_ident("param") {
            let mut input = false;
            let mut output = false;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("input") {
                    input = true;
                } else if meta.path.is_ident("output") {
                    output = true;
                } else {
                    return Err(meta.error("expected `input` and/or `output`"));
                }
                Ok(())
            })?;
            if !input && !output {
                return Err(syn::Error::new_spanned(
                    attr,
                    "#[param] needs a direction: input, output or both",
                ));
            }
            param = Some((input, output));
        } else if attr.path().is_ident("resultset") {
            let mut name = ident.to_string();
            if !matches!(attr.meta, syn::Meta::Path(_)) {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("name") {
                        let lit: LitStr = meta.value()?.parse()?;
                        name = lit.value();
                        Ok(())
                    } else {
                        Err(meta.error("unknown #[resultset(...)] attribute"))
                    }
                })?;
            }
            result_set = Some(name);
        }
    }

    match (param, result_set) {
        (Some(_), Some(_)) => Err(syn::Error::new_spanned(
            &ident,
            "a field cannot be both a parameter and a result set",
        )),
        (Some((input, output)), None) => Ok(Some(ProcedureField {
            ident,
            binding: Binding::Param { input, output },
        })),
        (None, Some(name)) => Ok(Some(ProcedureField {
            ident,
            binding: Binding::ResultSet(name),
        })),
        (None, None) => Ok(None),
    }
}

fn descriptor_builder(
    krate: &TokenStream,
    type_name: &str,
    attrs: &ProcedureAttrs,
    bound: &[ProcedureField],
) -> TokenStream {
    let name = attrs.name.iter().map(|n| quote!(.name(#n)));
    let schema = attrs.schema.iter().map(|s| quote!(.schema(#s)));
    let catalog = attrs.catalog.iter().map(|c| quote!(.catalog(#c)));
    let naming = attrs.naming.iter().map(|n| quote!(.naming(#n)));
    let bindings = bound.iter().map(|field| {
        let field_name = field.ident.to_string();
        match &field.binding {
            Binding::Param { input, output } => {
                let input = input
                    .then(|| quote!(.input(#field_name)))
                    .unwrap_or_default();
                let output = output
                    .then(|| quote!(.output(#field_name)))
                    .unwrap_or_default();
                quote!(#input #output)
            }
            Binding::ResultSet(name) => quote!(.result_set(#name)),
        }
    });
    quote! {
        #krate::ProcedureDescriptor::builder(#type_name)
            #(#name)* #(#schema)* #(#catalog)* #(#naming)*
            #(#bindings)*
            .build()
    }
}

fn to_params_body(bound: &[ProcedureField]) -> TokenStream {
    let inserts = bound
        .iter()
        .filter(|f| matches!(f.binding, Binding::Param { input: true, .. }))
        .map(|field| {
            let field_ident = &field.ident;
            let field_name = field.ident.to_string();
            quote!(params.insert(#field_name, ::core::clone::Clone::clone(&self.#field_ident));)
        });
    quote!(#(#inserts)*)
}

fn absorb_body(krate: &TokenStream, bound: &[ProcedureField]) -> TokenStream {
    let writes = bound.iter().filter_map(|field| {
        let field_ident = &field.ident;
        match &field.binding {
            Binding::Param { output: true, .. } => {
                let field_name = field.ident.to_string();
                Some(quote!(self.#field_ident = output.params.get_as(#field_name)?;))
            }
            Binding::Param { .. } => None,
            Binding::ResultSet(name) => Some(quote! {
                self.#field_ident = match output.result_sets.get(#name) {
                    Some(rows) => rows
                        .iter()
                        .map(#krate::FromRow::from_row)
                        .collect::<#krate::Result<_>>()?,
                    None => ::std::vec::Vec::new(),
                };
            }),
        }
    });
    quote!(#(#writes)*)
}
