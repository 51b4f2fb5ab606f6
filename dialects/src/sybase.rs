use crossdao_core::{CrossdaoError, Result, Sort};

use crate::SqlDialect;

/// Sybase ASE: `SELECT TOP n` over a subquery wrap; pagination is not
/// expressible and fails explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct SybaseDialect;

impl SqlDialect for SybaseDialect {
    fn name(&self) -> &'static str {
        "sybase"
    }

    fn top(&self, sql: &str, n: u64) -> String {
        format!("SELECT TOP {n} * FROM ({sql}) T")
    }

    fn paginate(&self, _sql: &str, _page: u64, _size: u64, _sort: &Sort) -> Result<String> {
        Err(CrossdaoError::UnsupportedOperation {
            dialect: self.name(),
            operation: "pagination",
        })
    }
}
