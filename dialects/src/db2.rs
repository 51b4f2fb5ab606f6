use crossdao_core::{Result, Sort};

use crate::{SqlDialect, require_sort};

/// DB2: `FETCH FIRST n ROWS ONLY` top; pagination via `ROW_NUMBER() OVER`
/// with a 1-based window. Paginating without a sort order is a user error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Db2Dialect;

impl SqlDialect for Db2Dialect {
    fn name(&self) -> &'static str {
        "db2"
    }

    fn top(&self, sql: &str, n: u64) -> String {
        format!("{sql} FETCH FIRST {n} ROWS ONLY")
    }

    fn paginate(&self, sql: &str, page: u64, size: u64, sort: &Sort) -> Result<String> {
        require_sort(self.name(), sort)?;
        let start = page * size + 1;
        let end = (page + 1) * size;
        Ok(format!(
            "SELECT * FROM (SELECT INNER_TABLE.*, ROW_NUMBER() OVER(ORDER BY {order}) AS RN \
             FROM ({sql}) INNER_TABLE) WHERE RN BETWEEN {start} AND {end}",
            order = sort.render()
        ))
    }

    fn sequence_next(&self, sequence: &str) -> Result<String> {
        Ok(format!("SELECT NEXT VALUE FOR {sequence} FROM SYSIBM.SYSDUMMY1"))
    }
}
