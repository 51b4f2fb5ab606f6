//! Core types for the crossdao data-access layer.
//!
//! This crate holds everything the engine crates agree on: the owned
//! [`Value`] parameter model, named-parameter maps, rows coming back from
//! the execution primitive, the immutable entity/procedure descriptors with
//! their memoized SQL fragments, the process-wide descriptor registry, and
//! the [`Executor`] boundary behind which all actual database I/O lives.

pub mod descriptor;
pub mod entity;
pub mod error;
pub mod executor;
pub mod page;
pub mod params;
pub mod registry;
pub mod row;
pub mod tracing;
pub mod value;

// Re-export key types and traits
pub use descriptor::{
    CaseStyle, ColumnDef, ColumnDescriptor, Generator, Naming, ProcedureDescriptor, TableDescriptor,
};
pub use entity::{Entity, ProcedureEntity};
pub use error::{CrossdaoError, Result};
pub use executor::{Executor, ProcedureOutput};
pub use page::{OrderBy, Page, PageRequest, Sort};
pub use params::Params;
pub use row::{FromRow, Row, Scalar};
pub use value::{FromValue, Value};
