use crossdao_core::{Result, Sort};

use crate::SqlDialect;

/// Oracle: `FETCH FIRST n ROWS ONLY` top; pagination via the classic
/// ROWNUM double-wrap. Sorting is applied to the inner query *before*
/// ROWNUM is assigned — ordering after assignment would number the rows
/// first and sort them afterwards, returning the wrong window.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleDialect;

impl SqlDialect for OracleDialect {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn top(&self, sql: &str, n: u64) -> String {
        format!("{sql} FETCH FIRST {n} ROWS ONLY")
    }

    fn paginate(&self, sql: &str, page: u64, size: u64, sort: &Sort) -> Result<String> {
        let start = page * size;
        let end = (page + 1) * size;
        let sorted = self.sort(sql, sort);
        Ok(format!(
            "SELECT * FROM (SELECT P.*, ROWNUM AS RNUM FROM ({sorted}) P) \
             WHERE RNUM > {start} AND RNUM <= {end}"
        ))
    }

    fn sequence_next(&self, sequence: &str) -> Result<String> {
        Ok(format!("SELECT {sequence}.NEXTVAL FROM DUAL"))
    }
}
