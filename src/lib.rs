//! Portable entity CRUD and stored-procedure engine with per-product SQL
//! dialects and datasource routing.
//!
//! Entities are plain structs tagged with `#[derive(Entity)]`; the derive
//! builds an immutable table descriptor (column mapping, key set, memoized
//! SQL fragments) that every operation renders from. A [`Router`] holds the
//! registered datasources and probes each one's dialect once; a
//! [`RoutingContext`] scopes datasource switches to a closure; [`Dao`] and
//! [`Procedure`] run the actual operations through the [`Executor`]
//! boundary.
//!
//! | Product              | top-N              | pagination              |
//! |----------------------|--------------------|-------------------------|
//! | MySQL / MariaDB      | `LIMIT`            | `LIMIT offset, size`    |
//! | H2                   | `LIMIT`            | `LIMIT offset, size`    |
//! | PostgreSQL           | `LIMIT`            | unsupported             |
//! | Oracle               | `FETCH FIRST`      | `ROWNUM` wrap           |
//! | DB2                  | `FETCH FIRST`      | `ROW_NUMBER()` (sorted) |
//! | SQL Server ≥ 2012    | `TOP`              | `OFFSET/FETCH` (sorted) |
//! | SQL Server < 2012    | `TOP`              | `ROW_NUMBER()` (sorted) |
//! | Sybase ASE           | `TOP`              | unsupported             |
//! | Firebird             | `FIRST`            | unsupported             |
//!
//! ```ignore
//! use crossdao::prelude::*;
//!
//! #[derive(Entity, Debug, Clone, Default)]
//! struct Account {
//!     #[column(key, generated = "identity")]
//!     id: Option<i64>,
//!     name: String,
//! }
//!
//! let router = Router::builder()
//!     .datasource("main", executor)
//!     .build()?;
//! let ctx = router.context();
//! let dao = ctx.dao::<Account>()?;
//!
//! let mut account = Account { id: None, name: "Ada".into() };
//! dao.retrieve_insert(&mut account)?;
//! let found = dao.find_by_id([account.id])?;
//! ```

pub mod dao;
pub mod procedure;
pub mod router;

pub use dao::Dao;
pub use procedure::Procedure;
pub use router::{DatasourceKey, Router, RouterBuilder, RoutingContext};

pub use crossdao_core::{
    CaseStyle, ColumnDef, ColumnDescriptor, CrossdaoError, Entity, Executor, FromRow, FromValue,
    Generator, Naming, OrderBy, Page, PageRequest, Params, ProcedureDescriptor, ProcedureEntity,
    ProcedureOutput, Result, Row, Scalar, Sort, TableDescriptor, Value, params, registry,
};
pub use crossdao_dialects::{
    Db2Dialect, DialectRegistry, FirebirdDialect, H2Dialect, Mssql2008Dialect, Mssql2012Dialect,
    MySqlDialect, OracleDialect, PostgresDialect, SqlDialect, SybaseDialect,
};
pub use crossdao_macros::{Entity, Procedure};

pub mod prelude {
    //! Everything a typical caller needs in scope.
    pub use crate::{
        CrossdaoError, Dao, DatasourceKey, DialectRegistry, Entity, Executor, FromRow, FromValue,
        OrderBy, Page, PageRequest, Params, Procedure, ProcedureEntity, ProcedureOutput, Result,
        Router, RouterBuilder, RoutingContext, Row, Scalar, Sort, SqlDialect, Value, params,
    };
}
