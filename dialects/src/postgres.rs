use crossdao_core::{CrossdaoError, Result, Sort};

use crate::SqlDialect;

/// PostgreSQL as configured here: `LIMIT n` top and `NEXTVAL` sequences,
/// with pagination deliberately unsupported rather than silently borrowing
/// another product's syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn top(&self, sql: &str, n: u64) -> String {
        format!("{sql} LIMIT {n}")
    }

    fn paginate(&self, _sql: &str, _page: u64, _size: u64, _sort: &Sort) -> Result<String> {
        Err(CrossdaoError::UnsupportedOperation {
            dialect: self.name(),
            operation: "pagination",
        })
    }

    fn sequence_next(&self, sequence: &str) -> Result<String> {
        Ok(format!("SELECT NEXTVAL('{sequence}')"))
    }
}
