use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, LitStr};

use crate::util;

struct EntityAttrs {
    table: Option<LitStr>,
    schema: Option<LitStr>,
    catalog: Option<LitStr>,
    naming: Option<TokenStream>,
}

struct EntityField {
    ident: syn::Ident,
    name: Option<LitStr>,
    key: bool,
    generator: Option<TokenStream>,
    skip: bool,
}

pub(crate) fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let krate = util::krate();
    let ident = &input.ident;
    let type_name = ident.to_string();
    let attrs = parse_entity_attrs(&input)?;

    let fields = util::named_fields(&input, "Entity")?;
    let mut mapped = Vec::new();
    let mut skipped = Vec::new();
    for field in &fields.named {
        let parsed = parse_field(&krate, field)?;
        if parsed.skip {
            skipped.push(parsed);
        } else {
            mapped.push(parsed);
        }
    }
    if mapped.is_empty() {
        return Err(syn::Error::new_spanned(
            ident,
            "#[derive(Entity)] requires at least one mapped field",
        ));
    }

    let builder = descriptor_builder(&krate, &type_name, &attrs, &mapped);
    let from_row = from_row_impl(&krate, ident, &mapped, &skipped);
    let to_params = to_params_body(&mapped);
    let set_generated_key = set_generated_key_impl(&krate, &mapped);
    let field_count = mapped.len();

    Ok(quote! {
        #from_row

        #[automatically_derived]
        impl #krate::Entity for #ident {
            fn descriptor() -> #krate::Result<#krate::TableDescriptor> {
                #builder
            }

            fn to_params(&self) -> #krate::Params {
                let mut params = #krate::Params::with_capacity(#field_count);
                #to_params
                params
            }

            #set_generated_key
        }
    })
}

fn parse_entity_attrs(input: &DeriveInput) -> syn::Result<EntityAttrs> {
    let krate = util::krate();
    let mut attrs = EntityAttrs {
        table: None,
        schema: None,
        catalog: None,
        naming: None,
    };
    for attr in &input.attrs {
        if !attr.path().is_ident("entity") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                attrs.table = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("schema") {
                attrs.schema = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("catalog") {
                attrs.catalog = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("naming") {
                let lit: LitStr = meta.value()?.parse()?;
                attrs.naming = Some(util::naming_tokens(&krate, &lit)?);
            } else {
                return Err(meta.error("unknown #[entity(...)] attribute"));
            }
            Ok(())
        })?;
    }
    Ok(attrs)
}

fn parse_field(krate: &TokenStream, field: &syn::Field) -> syn::Result<EntityField> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
    let mut parsed = EntityField {
        ident,
        name: None,
        key: false,
        generator: None,
        skip: false,
    };
    for attr in &field.attrs {
        if !attr.path().is_ident("column") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                parsed.name = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("key") {
                parsed.key = true;
            } else if meta.path.is_ident("generated") {
                let lit: LitStr = meta.value()?.parse()?;
                parsed.generator = Some(generator_tokens(krate, &lit)?);
            } else if meta.path.is_ident("skip") {
                parsed.skip = true;
            } else {
                return Err(meta.error("unknown #[column(...)] attribute"));
            }
            Ok(())
        })?;
    }
    if parsed.skip && (parsed.key || parsed.name.is_some() || parsed.generator.is_some()) {
        return Err(syn::Error::new_spanned(
            &parsed.ident,
            "#[column(skip)] cannot be combined with other column attributes",
        ));
    }
    Ok(parsed)
}

fn generator_tokens(krate: &TokenStream, lit: &LitStr) -> syn::Result<TokenStream> {
    let value = lit.value();
    if value == "identity" {
        return Ok(quote!(#krate::Generator::Identity));
    }
    if let Some(sequence) = value.strip_prefix("sequence:") {
        let sequence = sequence.trim();
        if sequence.is_empty() {
            return Err(syn::Error::new_spanned(lit, "empty sequence name"));
        }
        let seq = LitStr::new(sequence, lit.span());
        return Ok(quote!(#krate::Generator::Sequence(#seq)));
    }
    Err(syn::Error::new_spanned(
        lit,
        "expected \"identity\" or \"sequence:<NAME>\"",
    ))
}

fn descriptor_builder(
    krate: &TokenStream,
    type_name: &str,
    attrs: &EntityAttrs,
    mapped: &[EntityField],
) -> TokenStream {
    let table = attrs.table.iter().map(|t| quote!(.table(#t)));
    let schema = attrs.schema.iter().map(|s| quote!(.schema(#s)));
    let catalog = attrs.catalog.iter().map(|c| quote!(.catalog(#c)));
    let naming = attrs.naming.iter().map(|n| quote!(.naming(#n)));
    let columns = mapped.iter().map(|field| {
        let field_name = field.ident.to_string();
        let name = field.name.iter().map(|n| quote!(.name(#n)));
        let key = field.key.then(|| quote!(.key())).unwrap_or_default();
        let generated = field.generator.iter().map(|g| quote!(.generated(#g)));
        quote!(.column(#krate::ColumnDef::new(#field_name) #(#name)* #key #(#generated)*))
    });
    quote! {
        #krate::TableDescriptor::builder(#type_name)
            #(#table)* #(#schema)* #(#catalog)* #(#naming)*
            #(#columns)*
            .build()
    }
}

fn from_row_impl(
    krate: &TokenStream,
    ident: &syn::Ident,
    mapped: &[EntityField],
    skipped: &[EntityField],
) -> TokenStream {
    let mapped_fields = mapped.iter().map(|field| {
        let field_ident = &field.ident;
        let field_name = field.ident.to_string();
        quote!(#field_ident: row.get_as(#field_name)?)
    });
    let skipped_fields = skipped.iter().map(|field| {
        let field_ident = &field.ident;
        quote!(#field_ident: ::core::default::Default::default())
    });
    quote! {
        #[automatically_derived]
        impl #krate::FromRow for #ident {
            fn from_row(row: &#krate::Row) -> #krate::Result<Self> {
                Ok(Self {
                    #(#mapped_fields,)*
                    #(#skipped_fields,)*
                })
            }
        }
    }
}

fn to_params_body(mapped: &[EntityField]) -> TokenStream {
    let inserts = mapped.iter().map(|field| {
        let field_ident = &field.ident;
        let field_name = field.ident.to_string();
        quote!(params.insert(#field_name, ::core::clone::Clone::clone(&self.#field_ident));)
    });
    quote!(#(#inserts)*)
}

/// Only entities with a generator column override the default no-op.
fn set_generated_key_impl(krate: &TokenStream, mapped: &[EntityField]) -> TokenStream {
    let generated = mapped.iter().find(|field| field.generator.is_some());
    match generated {
        Some(field) => {
            let field_ident = &field.ident;
            quote! {
                fn set_generated_key(&mut self, key: &#krate::Value) -> #krate::Result<()> {
                    self.#field_ident = #krate::FromValue::from_value(key)?;
                    Ok(())
                }
            }
        }
        None => TokenStream::new(),
    }
}
