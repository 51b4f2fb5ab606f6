//! Derive macros generating the crossdao entity and stored-procedure
//! trait impls from struct field tags.

extern crate proc_macro;

mod entity;
mod procedure;
mod util;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Maps a struct to a table.
///
/// # Struct attributes
///
/// `#[entity(table = "ACCOUNT", schema = "APP", catalog = "CAT", naming = "upper_snake")]`
///
/// All optional. Without `table` the name is derived from the type name via
/// the naming convention (`upper_snake` by default; also `snake`,
/// `preserve`).
///
/// # Field attributes
///
/// - `#[column(name = "STATUS_CD")]` — explicit column name
/// - `#[column(key)]` — primary-key column
/// - `#[column(generated = "identity")]` — database-assigned value,
///   excluded from insert lists
/// - `#[column(generated = "sequence:SEQ_ACCOUNT")]` — value fetched from a
///   sequence and assigned before insert
/// - `#[column(skip)]` — not mapped at all; the field type must implement
///   `Default` for row mapping
///
/// Field types must convert into and out of `crossdao::Value`.
///
/// ```ignore
/// #[derive(Entity, Debug, Clone, Default)]
/// struct Account {
///     #[column(key, generated = "identity")]
///     id: Option<i64>,
///     name: String,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(entity, column))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match entity::expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Maps a struct to a stored-procedure call.
///
/// # Struct attributes
///
/// `#[procedure(name = "P_SYNC", schema = "APP", catalog = "CAT", naming = "upper_snake")]`
///
/// Without `name` the procedure name is derived from the type name via the
/// naming convention.
///
/// # Field attributes
///
/// - `#[param(input)]` / `#[param(output)]` / `#[param(input, output)]`
/// - `#[resultset]` or `#[resultset(name = "failed")]` on a `Vec<T>` field
///   where `T` implements `FromRow` (a derived entity, `Row` for map
///   binding, or `Scalar<T>` for single-column binding)
///
/// Untagged fields take no part in the call.
#[proc_macro_derive(Procedure, attributes(procedure, param, resultset))]
pub fn derive_procedure(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match procedure::expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
