use crossdao_core::{Result, Sort};

use crate::SqlDialect;

/// H2 tracks the MySQL family for top-N and pagination, and additionally
/// supports standard sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct H2Dialect;

impl SqlDialect for H2Dialect {
    fn name(&self) -> &'static str {
        "h2"
    }

    fn top(&self, sql: &str, n: u64) -> String {
        format!("{sql} LIMIT {n}")
    }

    fn paginate(&self, sql: &str, page: u64, size: u64, sort: &Sort) -> Result<String> {
        let offset = page * size;
        let sorted = self.sort(&self.wrap_subquery(sql), sort);
        Ok(format!("{sorted} LIMIT {offset}, {size}"))
    }

    fn sequence_next(&self, sequence: &str) -> Result<String> {
        Ok(format!("SELECT NEXT VALUE FOR {sequence}"))
    }
}
