use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrossdaoError {
    /// The type cannot be mapped to a table (blank table name, no mapped columns)
    #[error("`{entity}` is not a table entity: {reason}")]
    NotATableEntity {
        entity: &'static str,
        reason: String,
    },

    /// The type cannot be mapped to a stored procedure
    #[error("`{entity}` is not a stored-procedure entity: {reason}")]
    NotAStoredProcedureEntity {
        entity: &'static str,
        reason: String,
    },

    /// More than one column carries a generator marker
    #[error("`{entity}` declares more than one generator column")]
    MultipleGeneratorColumns { entity: &'static str },

    /// A keyed operation was requested on an entity without primary-key columns
    #[error("`{entity}` has no primary-key columns")]
    NoPrimaryKey { entity: &'static str },

    /// Keyed lookup received the wrong number of key values
    #[error("expected {expected} key value(s), got {actual}")]
    ParameterCountMismatch { expected: usize, actual: usize },

    /// A sort key names a field the entity does not map
    #[error("unknown sort field `{field}`")]
    UnknownSortField { field: String },

    /// The dialect cannot paginate without an explicit sort order
    #[error("`{dialect}` pagination requires an explicit sort order")]
    PaginationRequiresSort { dialect: &'static str },

    /// The dialect cannot express the requested operation
    #[error("`{dialect}` does not support {operation}")]
    UnsupportedOperation {
        dialect: &'static str,
        operation: &'static str,
    },

    /// No dialect is registered for the detected database product
    #[error("unsupported database product `{product}` (version `{version}`)")]
    UnsupportedDatabase { product: String, version: String },

    /// A routing switch targeted a key that was never registered
    #[error("unknown datasource `{key}`")]
    UnknownDatasource { key: String },

    /// Error mapping a row or value onto an entity field
    #[error("mapping error: {0}")]
    Mapping(String),

    /// Anything raised by the execution primitive, passed through verbatim
    #[error("execution error: {0}")]
    Execution(String),
}

impl CrossdaoError {
    /// Wraps an execution-primitive failure without reinterpreting it.
    pub fn execution(err: impl std::fmt::Display) -> Self {
        Self::Execution(err.to_string())
    }

    pub fn mapping(err: impl std::fmt::Display) -> Self {
        Self::Mapping(err.to_string())
    }
}

/// Result type for data-access operations
pub type Result<T> = std::result::Result<T, CrossdaoError>;
