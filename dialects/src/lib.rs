//! Per-product SQL dialects.
//!
//! A [`SqlDialect`] turns abstract SQL intents (select-base, count, top-N,
//! paginate, insert/update/delete) into syntactically correct text for one
//! database product. The product-independent renderings are trait defaults;
//! each product overrides only what actually diverges — which, across a
//! dozen products, is almost entirely top-N and pagination.
//!
//! Dialect selection is deterministic per physical datasource: the router
//! probes the product name/version once and resolves it through the
//! [`DialectRegistry`], never per call.

mod db2;
mod firebird;
mod h2;
mod mssql;
mod mysql;
mod oracle;
mod postgres;
mod registry;
mod sybase;

pub use db2::Db2Dialect;
pub use firebird::FirebirdDialect;
pub use h2::H2Dialect;
pub use mssql::{Mssql2008Dialect, Mssql2012Dialect};
pub use mysql::MySqlDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;
pub use registry::DialectRegistry;
pub use sybase::SybaseDialect;

use crossdao_core::{CrossdaoError, Result, Sort};

/// Strategy object rendering abstract SQL intents for one database product.
///
/// `paginate` takes a 0-based page number; `sort` keys must already be
/// physical column names (the engine maps entity fields before calling in).
pub trait SqlDialect: Send + Sync {
    fn name(&self) -> &'static str;

    /// `SELECT {columns} FROM {table} {tail}`
    fn select_base(&self, table: &str, columns: &str, tail: &str) -> String {
        let mut sql = format!("SELECT {columns} FROM {table}");
        if !tail.is_empty() {
            sql.push(' ');
            sql.push_str(tail);
        }
        sql
    }

    /// `SELECT T.* FROM ({sql}) T` — lets ORDER BY and pagination layer on
    /// an arbitrary inner query.
    fn wrap_subquery(&self, sql: &str) -> String {
        format!("SELECT T.* FROM ({sql}) T")
    }

    fn count(&self, table: &str, tail: &str) -> String {
        let mut sql = format!("SELECT COUNT(*) FROM {table}");
        if !tail.is_empty() {
            sql.push(' ');
            sql.push_str(tail);
        }
        sql
    }

    fn count_wrapped(&self, sql: &str) -> String {
        format!("SELECT COUNT(*) FROM ({sql}) C")
    }

    fn sort(&self, sql: &str, sort: &Sort) -> String {
        if sort.is_empty() {
            sql.to_owned()
        } else {
            format!("{sql} ORDER BY {}", sort.render())
        }
    }

    /// Caps the query to its first `n` rows.
    fn top(&self, sql: &str, n: u64) -> String;

    /// Renders page `page` (0-based) of `size` rows. Fails with
    /// `PaginationRequiresSort` or `UnsupportedOperation` where the product
    /// cannot express it; never falls back to another dialect's syntax.
    fn paginate(&self, sql: &str, page: u64, size: u64, sort: &Sort) -> Result<String>;

    fn insert(&self, table: &str, columns: &str, values: &str) -> String {
        format!("INSERT INTO {table} ({columns}) VALUES ({values})")
    }

    fn update(&self, table: &str, set: &str, tail: &str) -> String {
        let mut sql = format!("UPDATE {table} SET {set}");
        if !tail.is_empty() {
            sql.push(' ');
            sql.push_str(tail);
        }
        sql
    }

    fn delete(&self, table: &str, tail: &str) -> String {
        let mut sql = format!("DELETE FROM {table}");
        if !tail.is_empty() {
            sql.push(' ');
            sql.push_str(tail);
        }
        sql
    }

    /// Query advancing and returning the named sequence's next value, for
    /// products with sequence generators.
    fn sequence_next(&self, sequence: &str) -> Result<String> {
        let _ = sequence;
        Err(CrossdaoError::UnsupportedOperation {
            dialect: self.name(),
            operation: "sequence generators",
        })
    }
}

impl core::fmt::Debug for dyn SqlDialect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("SqlDialect").field(&self.name()).finish()
    }
}

pub(crate) fn require_sort(dialect: &'static str, sort: &Sort) -> Result<()> {
    if sort.is_empty() {
        Err(CrossdaoError::PaginationRequiresSort { dialect })
    } else {
        Ok(())
    }
}
