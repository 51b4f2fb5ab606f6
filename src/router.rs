//! Datasource registration and per-unit-of-work routing.
//!
//! A [`Router`] owns the process-wide datasource table: every key maps to an
//! executor plus a dialect that is probed from the live connection once and
//! cached. A [`RoutingContext`] is the short-lived, single-threaded view a
//! unit of work operates through; datasource switches are scoped to a
//! closure and always restored, panics included.

use std::cell::RefCell;
use std::fmt;
use std::sync::{Arc, OnceLock};

use compact_str::CompactString;
use crossdao_core::{CrossdaoError, Executor, Result, crossdao_trace_route};
use crossdao_dialects::{DialectRegistry, SqlDialect};

/// Name under which a datasource is registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasourceKey(CompactString);

impl DatasourceKey {
    pub fn new(key: impl Into<CompactString>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DatasourceKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for DatasourceKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

impl fmt::Display for DatasourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

struct DatasourceEntry {
    key: DatasourceKey,
    executor: Arc<dyn Executor>,
    // Probed from the executor on first use, stable afterwards.
    dialect: OnceLock<Arc<dyn SqlDialect>>,
}

/// The registered datasources, their probed dialects and the default key.
///
/// Shared freely across threads; the mutable switching state lives in
/// [`RoutingContext`], never here.
pub struct Router {
    entries: Vec<DatasourceEntry>,
    default_key: DatasourceKey,
    registry: DialectRegistry,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("default_key", &self.default_key)
            .field(
                "datasources",
                &self.entries.iter().map(|e| &e.key).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder {
            entries: Vec::new(),
            default_key: None,
            registry: DialectRegistry::builtin(),
        }
    }

    pub fn default_key(&self) -> &DatasourceKey {
        &self.default_key
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key.as_str() == key)
    }

    fn entry(&self, key: &str) -> Result<&DatasourceEntry> {
        self.entries
            .iter()
            .find(|e| e.key.as_str() == key)
            .ok_or_else(|| CrossdaoError::UnknownDatasource {
                key: key.to_owned(),
            })
    }

    pub fn executor(&self, key: &str) -> Result<Arc<dyn Executor>> {
        Ok(self.entry(key)?.executor.clone())
    }

    /// The dialect for a datasource. The first call probes the executor's
    /// product name/version and resolves it through the registry; later
    /// calls return the cached dialect without touching the executor.
    pub fn dialect(&self, key: &str) -> Result<Arc<dyn SqlDialect>> {
        let entry = self.entry(key)?;
        if let Some(dialect) = entry.dialect.get() {
            return Ok(dialect.clone());
        }
        let product = entry.executor.product_name()?;
        let version = entry.executor.product_version()?;
        let dialect = self.registry.resolve(&product, &version)?;
        Ok(entry.dialect.get_or_init(|| dialect).clone())
    }

    /// A fresh routing context starting at the default datasource.
    pub fn context(&self) -> RoutingContext<'_> {
        RoutingContext {
            router: self,
            selection: RefCell::new(Vec::new()),
        }
    }
}

pub struct RouterBuilder {
    entries: Vec<DatasourceEntry>,
    default_key: Option<DatasourceKey>,
    registry: DialectRegistry,
}

impl RouterBuilder {
    /// Registers a datasource. The first registered key becomes the default
    /// unless [`default_datasource`](Self::default_datasource) names another.
    pub fn datasource(mut self, key: impl Into<DatasourceKey>, executor: Arc<dyn Executor>) -> Self {
        self.entries.push(DatasourceEntry {
            key: key.into(),
            executor,
            dialect: OnceLock::new(),
        });
        self
    }

    pub fn default_datasource(mut self, key: impl Into<DatasourceKey>) -> Self {
        self.default_key = Some(key.into());
        self
    }

    /// Replaces the built-in dialect registry, for custom product matchers.
    pub fn dialect_registry(mut self, registry: DialectRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Fails with `UnknownDatasource` when nothing is registered or the
    /// chosen default names an unregistered key.
    pub fn build(self) -> Result<Router> {
        let default_key = match self.default_key {
            Some(key) => key,
            None => match self.entries.first() {
                Some(entry) => entry.key.clone(),
                None => {
                    return Err(CrossdaoError::UnknownDatasource {
                        key: "(no datasources registered)".to_owned(),
                    });
                }
            },
        };
        if !self.entries.iter().any(|e| e.key == default_key) {
            return Err(CrossdaoError::UnknownDatasource {
                key: default_key.as_str().to_owned(),
            });
        }
        Ok(Router {
            entries: self.entries,
            default_key,
            registry: self.registry,
        })
    }
}

/// Per-unit-of-work datasource selection.
///
/// Holds a stack of scoped switches over the router's default. The `RefCell`
/// makes this deliberately `!Sync`: one unit of work, one thread, one
/// context. Cross-thread work takes its own context from the router.
pub struct RoutingContext<'r> {
    router: &'r Router,
    selection: RefCell<Vec<DatasourceKey>>,
}

impl<'r> RoutingContext<'r> {
    pub fn router(&self) -> &'r Router {
        self.router
    }

    /// The innermost switched key, if any switch is active.
    pub fn current(&self) -> Option<DatasourceKey> {
        self.selection.borrow().last().cloned()
    }

    /// The key operations resolve against right now.
    pub fn current_key(&self) -> DatasourceKey {
        self.current()
            .unwrap_or_else(|| self.router.default_key.clone())
    }

    /// Runs `f` with `key` selected, restoring the previous selection on
    /// the way out — also when `f` panics. The key is validated up front so
    /// a typo fails before any statement runs against the wrong datasource.
    pub fn with_datasource<R>(
        &self,
        key: impl Into<DatasourceKey>,
        f: impl FnOnce(&Self) -> R,
    ) -> Result<R> {
        let key = key.into();
        if !self.router.is_registered(key.as_str()) {
            return Err(CrossdaoError::UnknownDatasource {
                key: key.as_str().to_owned(),
            });
        }
        crossdao_trace_route!("switch", key.as_str());
        self.selection.borrow_mut().push(key);
        let _guard = RestoreGuard {
            selection: &self.selection,
        };
        Ok(f(self))
    }

    pub fn executor(&self) -> Result<Arc<dyn Executor>> {
        self.router.executor(self.current_key().as_str())
    }

    pub fn dialect(&self) -> Result<Arc<dyn SqlDialect>> {
        self.router.dialect(self.current_key().as_str())
    }
}

struct RestoreGuard<'a> {
    selection: &'a RefCell<Vec<DatasourceKey>>,
}

impl Drop for RestoreGuard<'_> {
    fn drop(&mut self) {
        if let Some(key) = self.selection.borrow_mut().pop() {
            crossdao_trace_route!("restore", key.as_str());
        }
    }
}
