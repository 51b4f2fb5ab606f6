//! Immutable entity and stored-procedure descriptors.
//!
//! A descriptor is built once per type, validated eagerly, and then shared
//! read-only through the [registry](crate::registry). All derived SQL
//! fragments are computed at construction so rendering a statement later is
//! pure string assembly.

mod column;
mod naming;
mod procedure;
mod table;

pub use column::{ColumnDef, ColumnDescriptor, Generator};
pub use naming::{CaseStyle, Naming};
pub use procedure::{ProcedureBuilder, ProcedureDescriptor};
pub use table::{TableBuilder, TableDescriptor};
