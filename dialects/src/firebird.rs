use crossdao_core::{CrossdaoError, Result, Sort};

use crate::SqlDialect;

/// Firebird: `SELECT FIRST n` over a subquery wrap; pagination is left
/// deliberately unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirebirdDialect;

impl SqlDialect for FirebirdDialect {
    fn name(&self) -> &'static str {
        "firebird"
    }

    fn top(&self, sql: &str, n: u64) -> String {
        format!("SELECT FIRST {n} T.* FROM ({sql}) T")
    }

    fn paginate(&self, _sql: &str, _page: u64, _size: u64, _sort: &Sort) -> Result<String> {
        Err(CrossdaoError::UnsupportedOperation {
            dialect: self.name(),
            operation: "pagination",
        })
    }

    fn sequence_next(&self, sequence: &str) -> Result<String> {
        Ok(format!("SELECT GEN_ID({sequence}, 1) FROM RDB$DATABASE"))
    }
}
