use std::sync::Arc;

use crossdao_core::{CrossdaoError, Result};

use crate::{
    Db2Dialect, FirebirdDialect, H2Dialect, Mssql2008Dialect, Mssql2012Dialect, MySqlDialect,
    OracleDialect, PostgresDialect, SqlDialect, SybaseDialect,
};

type Matcher = Box<dyn Fn(&str, &str) -> bool + Send + Sync>;

struct DialectEntry {
    matcher: Matcher,
    dialect: Arc<dyn SqlDialect>,
}

/// Ordered `(product, version predicate) -> dialect` table.
///
/// The router resolves a dialect through this once per physical datasource
/// and caches the result; product and version do not change at runtime.
/// Supporting a new database product is one `register` call, not a switch
/// statement edit.
pub struct DialectRegistry {
    entries: Vec<DialectEntry>,
}

impl DialectRegistry {
    /// Registry with the built-in product entries.
    pub fn builtin() -> Self {
        let mut registry = Self {
            entries: Vec::new(),
        };
        registry.push(|p, _| contains(p, "mysql") || contains(p, "mariadb"), MySqlDialect);
        registry.push(|p, _| contains(p, "h2"), H2Dialect);
        registry.push(|p, _| contains(p, "postgres"), PostgresDialect);
        registry.push(|p, _| contains(p, "oracle"), OracleDialect);
        registry.push(|p, _| contains(p, "db2"), Db2Dialect);
        // Sybase ASE reports "Adaptive Server Enterprise"; match it before
        // the broad "sql server" predicate.
        registry.push(
            |p, _| contains(p, "adaptive server") || contains(p, "sybase"),
            SybaseDialect,
        );
        registry.push(
            |p, v| contains(p, "sql server") && major_version(v) >= 11,
            Mssql2012Dialect,
        );
        registry.push(|p, _| contains(p, "sql server"), Mssql2008Dialect);
        registry.push(|p, _| contains(p, "firebird"), FirebirdDialect);
        registry
    }

    fn push(
        &mut self,
        matcher: impl Fn(&str, &str) -> bool + Send + Sync + 'static,
        dialect: impl SqlDialect + 'static,
    ) {
        self.entries.push(DialectEntry {
            matcher: Box::new(matcher),
            dialect: Arc::new(dialect),
        });
    }

    /// Registers a custom entry ahead of the built-ins, so it can override
    /// them.
    pub fn register(
        &mut self,
        matcher: impl Fn(&str, &str) -> bool + Send + Sync + 'static,
        dialect: Arc<dyn SqlDialect>,
    ) {
        self.entries.insert(0, DialectEntry {
            matcher: Box::new(matcher),
            dialect,
        });
    }

    /// Maps a probed product name/version to a dialect.
    pub fn resolve(&self, product: &str, version: &str) -> Result<Arc<dyn SqlDialect>> {
        self.entries
            .iter()
            .find(|entry| (entry.matcher)(product, version))
            .map(|entry| entry.dialect.clone())
            .ok_or_else(|| CrossdaoError::UnsupportedDatabase {
                product: product.to_owned(),
                version: version.to_owned(),
            })
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn contains(product: &str, needle: &str) -> bool {
    product.to_ascii_lowercase().contains(needle)
}

fn major_version(version: &str) -> u32 {
    version
        .split('.')
        .next()
        .and_then(|major| major.trim().parse().ok())
        .unwrap_or(0)
}
