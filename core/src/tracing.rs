//! Tracing utilities for query and routing observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]`
//! boilerplate at every call site.

/// Emit a debug-level tracing event with the rendered SQL and parameter count.
///
/// ```ignore
/// crossdao_trace_query!(&sql, params.len());
/// ```
#[macro_export]
macro_rules! crossdao_trace_query {
    ($sql:expr, $param_count:expr) => {{
        #[cfg(feature = "tracing")]
        tracing::debug!(sql = %$sql, params = $param_count, "crossdao.query");
        #[cfg(not(feature = "tracing"))]
        {
            let _ = (&$sql, &$param_count);
        }
    }};
}

/// Emit a debug-level tracing event for a routing switch or restore.
///
/// ```ignore
/// crossdao_trace_route!("switch", key.as_str());
/// ```
#[macro_export]
macro_rules! crossdao_trace_route {
    ($event:literal, $key:expr) => {{
        #[cfg(feature = "tracing")]
        tracing::debug!(event = $event, datasource = %$key, "crossdao.route");
        #[cfg(not(feature = "tracing"))]
        {
            let _ = &$key;
        }
    }};
}
