use crossdao_core::{Result, Sort};

use crate::SqlDialect;

/// MySQL / MariaDB: `LIMIT n` top, `LIMIT offset, size` pagination applied
/// over a sorted subquery wrap.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl SqlDialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn top(&self, sql: &str, n: u64) -> String {
        format!("{sql} LIMIT {n}")
    }

    fn paginate(&self, sql: &str, page: u64, size: u64, sort: &Sort) -> Result<String> {
        let offset = page * size;
        let sorted = self.sort(&self.wrap_subquery(sql), sort);
        Ok(format!("{sorted} LIMIT {offset}, {size}"))
    }
}
