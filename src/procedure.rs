//! Stored-procedure engine.
//!
//! Procedure calls bypass SQL rendering entirely: the descriptor goes to
//! the execution primitive as-is, which owns the product-specific call
//! syntax. No dialect is involved.

use std::marker::PhantomData;
use std::sync::Arc;

use crossdao_core::registry;
use crossdao_core::{ProcedureDescriptor, ProcedureEntity, Result, crossdao_trace_query};

use crate::router::RoutingContext;

impl RoutingContext<'_> {
    /// A stored-procedure engine for `T`. Fails when `T`'s declaration is
    /// invalid (`NotAStoredProcedureEntity`).
    pub fn procedure<T: ProcedureEntity>(&self) -> Result<Procedure<'_, T>> {
        Ok(Procedure {
            context: self,
            descriptor: registry::procedure_of::<T>()?,
            _entity: PhantomData,
        })
    }
}

/// Executes one stored procedure mapped by `T` against the context's
/// current datasource.
pub struct Procedure<'c, T: ProcedureEntity> {
    context: &'c RoutingContext<'c>,
    descriptor: Arc<ProcedureDescriptor>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: ProcedureEntity> Procedure<'_, T> {
    pub fn descriptor(&self) -> &ProcedureDescriptor {
        &self.descriptor
    }

    /// Calls the procedure with the entity's input parameters, then writes
    /// output parameters and named result sets back onto the entity.
    pub fn execute(&self, entity: &mut T) -> Result<()> {
        let params = entity.to_params();
        crossdao_trace_query!(self.descriptor.qualified_name(), params.len());
        let output = self.context.executor()?.call_procedure(&self.descriptor, &params)?;
        entity.absorb(&output)
    }
}
