use crossdao_core::{Result, Sort};

use crate::{SqlDialect, require_sort};

/// MS SQL Server 2012 and later (major version >= 11): `SELECT TOP n` and
/// `OFFSET ... ROWS FETCH NEXT ... ROWS ONLY` pagination, which requires an
/// explicit ORDER BY.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mssql2012Dialect;

impl SqlDialect for Mssql2012Dialect {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn top(&self, sql: &str, n: u64) -> String {
        format!("SELECT TOP {n} * FROM ({sql}) T")
    }

    fn paginate(&self, sql: &str, page: u64, size: u64, sort: &Sort) -> Result<String> {
        require_sort(self.name(), sort)?;
        let start = page * size;
        Ok(format!(
            "{sql} ORDER BY {order} OFFSET {start} ROWS FETCH NEXT {size} ROWS ONLY",
            order = sort.render()
        ))
    }
}

/// MS SQL Server before 2012, which lacks OFFSET/FETCH: pagination falls
/// back to a `ROW_NUMBER()` wrap. Still requires an explicit sort.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mssql2008Dialect;

impl SqlDialect for Mssql2008Dialect {
    fn name(&self) -> &'static str {
        "mssql-2008"
    }

    fn top(&self, sql: &str, n: u64) -> String {
        format!("SELECT TOP {n} * FROM ({sql}) T")
    }

    fn paginate(&self, sql: &str, page: u64, size: u64, sort: &Sort) -> Result<String> {
        require_sort(self.name(), sort)?;
        let start = page * size;
        let end = (page + 1) * size;
        Ok(format!(
            "SELECT * FROM (SELECT ROW_NUMBER() OVER(ORDER BY {order}) AS RNUM, T.* \
             FROM ({sql}) T) P WHERE RNUM > {start} AND RNUM <= {end}",
            order = sort.render()
        ))
    }
}
