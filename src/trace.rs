//! Tracing hooks for grouping and SQL execution.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate. The
//! macros expand to nothing when the feature is off.

/// Debug-level event, e.g. a phase summary.
macro_rules! rowgraph_debug {
    ($($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        tracing::debug!($($arg)+);
    };
}

/// Trace-level event for per-parent detail.
macro_rules! rowgraph_trace {
    ($($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        tracing::trace!($($arg)+);
    };
}

pub(crate) use {rowgraph_debug, rowgraph_trace};
