//! Process-wide, read-mostly descriptor caches keyed by type identity.
//!
//! Descriptors are pure functions of a type's static declaration, so a
//! first-use race on the same key only costs redundant computation: the
//! first value stored wins and every caller converges on it. Construction
//! errors are returned, not cached, so a misconfigured entity fails loudly
//! on every use.

use std::any::TypeId;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use hashbrown::HashMap;

use crate::descriptor::{ProcedureDescriptor, TableDescriptor};
use crate::entity::{Entity, ProcedureEntity};
use crate::error::Result;

static TABLES: OnceLock<RwLock<HashMap<TypeId, Arc<TableDescriptor>>>> = OnceLock::new();
static PROCEDURES: OnceLock<RwLock<HashMap<TypeId, Arc<ProcedureDescriptor>>>> = OnceLock::new();

fn cached<D>(
    lock: &RwLock<HashMap<TypeId, Arc<D>>>,
    key: TypeId,
    build: impl FnOnce() -> Result<D>,
) -> Result<Arc<D>> {
    {
        let read = lock.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(found) = read.get(&key) {
            return Ok(found.clone());
        }
    }

    let built = Arc::new(build()?);
    let mut write = lock.write().unwrap_or_else(PoisonError::into_inner);
    Ok(write.entry(key).or_insert(built).clone())
}

/// The shared table descriptor for `T`, built on first use.
pub fn table_of<T: Entity>() -> Result<Arc<TableDescriptor>> {
    let lock = TABLES.get_or_init(Default::default);
    cached(lock, TypeId::of::<T>(), T::descriptor)
}

/// The shared procedure descriptor for `T`, built on first use.
pub fn procedure_of<T: ProcedureEntity>() -> Result<Arc<ProcedureDescriptor>> {
    let lock = PROCEDURES.get_or_init(Default::default);
    cached(lock, TypeId::of::<T>(), T::descriptor)
}
