use hashbrown::HashMap;

use crate::descriptor::ProcedureDescriptor;
use crate::error::Result;
use crate::params::Params;
use crate::row::Row;
use crate::value::Value;

/// Everything a stored-procedure call hands back: output parameters plus
/// any named result sets.
#[derive(Debug, Clone, Default)]
pub struct ProcedureOutput {
    pub params: Row,
    pub result_sets: HashMap<String, Vec<Row>>,
}

/// The database access primitive.
///
/// This is the §6 boundary of the system: the engine decides *what* SQL and
/// parameters to send, an `Executor` implementation talks wire protocol.
/// Implementations live outside this workspace (a driver adapter in
/// production, a scripted mock in tests). Errors cross this boundary
/// verbatim inside [`CrossdaoError::Execution`](crate::CrossdaoError);
/// the engine never retries or reinterprets them.
pub trait Executor: Send + Sync {
    fn query(&self, sql: &str, params: &Params) -> Result<Vec<Row>>;

    fn query_one(&self, sql: &str, params: &Params) -> Result<Option<Row>>;

    /// Runs a statement and returns the affected-row count.
    fn execute(&self, sql: &str, params: &Params) -> Result<u64>;

    /// Runs an insert and additionally captures the database-generated key.
    fn execute_returning_key(&self, sql: &str, params: &Params) -> Result<(u64, Value)>;

    /// Runs one statement against an ordered list of parameter maps and
    /// returns per-element affected counts in the same order.
    fn execute_batch(&self, sql: &str, batches: &[Params]) -> Result<Vec<u64>>;

    fn call_procedure(
        &self,
        descriptor: &ProcedureDescriptor,
        params: &Params,
    ) -> Result<ProcedureOutput>;

    /// Database product name, probed once per datasource by the router.
    fn product_name(&self) -> Result<String>;

    fn product_version(&self) -> Result<String>;
}
