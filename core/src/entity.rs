use crate::descriptor::{ProcedureDescriptor, TableDescriptor};
use crate::error::Result;
use crate::executor::ProcedureOutput;
use crate::params::Params;
use crate::row::FromRow;
use crate::value::Value;

/// A type mapped to a table.
///
/// Usually implemented via `#[derive(Entity)]`; hand-written impls drive
/// [`TableDescriptor::builder`] directly. `descriptor()` is called once per
/// process and cached by the registry, so it may do non-trivial work but
/// must be deterministic.
pub trait Entity: FromRow + Send + Sync + Sized + 'static {
    /// Builds this type's table descriptor. Configuration errors
    /// (`NotATableEntity`, `MultipleGeneratorColumns`) surface here, at
    /// first use, never at query time.
    fn descriptor() -> Result<TableDescriptor>;

    /// Every mapped field as a named parameter, in column declaration order.
    fn to_params(&self) -> Params;

    /// Writes a generated key back onto the generated field with type-aware
    /// coercion. The default is a no-op for entities without a generator
    /// column.
    fn set_generated_key(&mut self, key: &Value) -> Result<()> {
        let _ = key;
        Ok(())
    }
}

/// A type mapped to a stored procedure call.
pub trait ProcedureEntity: Send + Sync + Sized + 'static {
    fn descriptor() -> Result<ProcedureDescriptor>;

    /// Input-parameter values by name.
    fn to_params(&self) -> Params;

    /// Writes output parameters and named result sets back onto this
    /// entity's fields after execution.
    fn absorb(&mut self, output: &ProcedureOutput) -> Result<()>;
}
