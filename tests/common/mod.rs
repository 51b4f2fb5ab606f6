#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossdao::{
    CrossdaoError, Entity, Executor, Params, Procedure, ProcedureDescriptor, ProcedureOutput,
    Result, Router, Row, Value,
};

/// One executor interaction as the engine issued it.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub sql: String,
    pub params: Vec<Params>,
}

#[derive(Debug)]
pub enum Reply {
    Rows(Vec<Row>),
    Affected(u64),
    AffectedEach(Vec<u64>),
    GeneratedKey(u64, Value),
    Procedure(ProcedureOutput),
    Fail(String),
}

/// Scripted stand-in for the execution primitive: records every statement
/// and pops queued replies in order. Unscripted reads return empty results;
/// unscripted writes affect one row.
pub struct MockExecutor {
    product: String,
    version: String,
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<RecordedCall>>,
    probes: AtomicUsize,
}

impl MockExecutor {
    pub fn new(product: &str, version: &str) -> Self {
        Self {
            product: product.to_owned(),
            version: version.to_owned(),
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            probes: AtomicUsize::new(0),
        }
    }

    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn push_rows(&self, rows: Vec<Row>) {
        self.push(Reply::Rows(rows));
    }

    /// Queues a one-column row, as count and sequence queries return.
    pub fn push_scalar(&self, value: impl Into<Value>) {
        let mut row = Row::new();
        row.insert("value", value);
        self.push(Reply::Rows(vec![row]));
    }

    pub fn push_affected(&self, count: u64) {
        self.push(Reply::Affected(count));
    }

    pub fn push_affected_each(&self, counts: Vec<u64>) {
        self.push(Reply::AffectedEach(counts));
    }

    pub fn push_generated_key(&self, count: u64, key: impl Into<Value>) {
        self.push(Reply::GeneratedKey(count, key.into()));
    }

    pub fn push_procedure_output(&self, output: ProcedureOutput) {
        self.push(Reply::Procedure(output));
    }

    pub fn push_failure(&self, message: &str) {
        self.push(Reply::Fail(message.to_owned()));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// How many times the router probed `product_name`.
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    fn record(&self, sql: &str, params: &[Params]) {
        self.calls.lock().unwrap().push(RecordedCall {
            sql: sql.to_owned(),
            params: params.to_vec(),
        });
    }

    fn pop(&self) -> Option<Reply> {
        self.replies.lock().unwrap().pop_front()
    }
}

impl Executor for MockExecutor {
    fn query(&self, sql: &str, params: &Params) -> Result<Vec<Row>> {
        self.record(sql, std::slice::from_ref(params));
        match self.pop() {
            Some(Reply::Rows(rows)) => Ok(rows),
            Some(Reply::Fail(msg)) => Err(CrossdaoError::execution(msg)),
            Some(other) => panic!("scripted reply mismatch for query: {other:?}"),
            None => Ok(Vec::new()),
        }
    }

    fn query_one(&self, sql: &str, params: &Params) -> Result<Option<Row>> {
        self.record(sql, std::slice::from_ref(params));
        match self.pop() {
            Some(Reply::Rows(rows)) => Ok(rows.into_iter().next()),
            Some(Reply::Fail(msg)) => Err(CrossdaoError::execution(msg)),
            Some(other) => panic!("scripted reply mismatch for query_one: {other:?}"),
            None => Ok(None),
        }
    }

    fn execute(&self, sql: &str, params: &Params) -> Result<u64> {
        self.record(sql, std::slice::from_ref(params));
        match self.pop() {
            Some(Reply::Affected(count)) => Ok(count),
            Some(Reply::Fail(msg)) => Err(CrossdaoError::execution(msg)),
            Some(other) => panic!("scripted reply mismatch for execute: {other:?}"),
            None => Ok(1),
        }
    }

    fn execute_returning_key(&self, sql: &str, params: &Params) -> Result<(u64, Value)> {
        self.record(sql, std::slice::from_ref(params));
        match self.pop() {
            Some(Reply::GeneratedKey(count, key)) => Ok((count, key)),
            Some(Reply::Fail(msg)) => Err(CrossdaoError::execution(msg)),
            other => panic!("expected a scripted generated key, got {other:?}"),
        }
    }

    fn execute_batch(&self, sql: &str, batches: &[Params]) -> Result<Vec<u64>> {
        self.record(sql, batches);
        match self.pop() {
            Some(Reply::AffectedEach(counts)) => Ok(counts),
            Some(Reply::Fail(msg)) => Err(CrossdaoError::execution(msg)),
            Some(other) => panic!("scripted reply mismatch for execute_batch: {other:?}"),
            None => Ok(vec![1; batches.len()]),
        }
    }

    fn call_procedure(
        &self,
        descriptor: &ProcedureDescriptor,
        params: &Params,
    ) -> Result<ProcedureOutput> {
        self.record(&descriptor.qualified_name(), std::slice::from_ref(params));
        match self.pop() {
            Some(Reply::Procedure(output)) => Ok(output),
            Some(Reply::Fail(msg)) => Err(CrossdaoError::execution(msg)),
            other => panic!("expected a scripted procedure output, got {other:?}"),
        }
    }

    fn product_name(&self) -> Result<String> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        Ok(self.product.clone())
    }

    fn product_version(&self) -> Result<String> {
        Ok(self.version.clone())
    }
}

/// One-datasource router over a fresh mock reporting the given product.
pub fn mock_router(product: &str, version: &str) -> (Router, Arc<MockExecutor>) {
    let executor = Arc::new(MockExecutor::new(product, version));
    let router = Router::builder()
        .datasource("main", executor.clone() as Arc<dyn Executor>)
        .build()
        .unwrap();
    (router, executor)
}

#[derive(Entity, Debug, Clone, Default, PartialEq)]
pub struct Account {
    #[column(key, generated = "identity")]
    pub id: Option<i64>,
    pub name: String,
}

/// Wider entity for partial-update tests; every non-key field nullable.
#[derive(Entity, Debug, Clone, Default, PartialEq)]
pub struct Customer {
    #[column(key)]
    pub id: Option<i64>,
    pub name: Option<String>,
    #[column(name = "EMAIL_ADDR")]
    pub email: Option<String>,
    pub city: Option<String>,
    pub score: Option<i64>,
}

/// No primary key: identifying WHERE falls back to the whole row.
#[derive(Entity, Debug, Clone, Default, PartialEq)]
pub struct AuditEvent {
    pub actor: Option<String>,
    pub action: Option<String>,
}

/// Sequence-generated key: assigned before insert, part of the statement.
#[derive(Entity, Debug, Clone, Default, PartialEq)]
pub struct Ticket {
    #[column(key, generated = "sequence:SEQ_TICKET")]
    pub id: Option<i64>,
    pub subject: String,
}

#[derive(Procedure, Debug, Clone, Default)]
#[procedure(name = "P_SYNC_ACCOUNTS")]
pub struct SyncAccounts {
    #[param(input)]
    pub cutoff: i64,
    #[param(output)]
    pub processed: Option<i64>,
    #[resultset(name = "failed")]
    pub failed: Vec<Account>,
}

pub fn account(id: i64, name: &str) -> Row {
    let mut row = Row::new();
    row.insert("id", id);
    row.insert("name", name);
    row
}
