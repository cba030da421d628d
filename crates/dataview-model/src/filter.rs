//! Post-processing steps applied to report tables before display.

use std::fmt;
use std::sync::Arc;

use serde_json::{Value, json};

use crate::error::FilterError;
use crate::table::DataTable;

/// Signature of a filter implementation.
pub type FilterFn = dyn Fn(&mut DataTable, &[Value]) -> Result<(), FilterError> + Send + Sync;

/// A closure filter with a label used in logs and snapshots.
#[derive(Clone)]
pub struct FilterCallback {
    label: String,
    func: Arc<FilterFn>,
}

impl FilterCallback {
    pub fn new<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut DataTable, &[Value]) -> Result<(), FilterError> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            func: Arc::new(func),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn call(&self, table: &mut DataTable, params: &[Value]) -> Result<(), FilterError> {
        (self.func)(table, params)
    }
}

impl fmt::Debug for FilterCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterCallback")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// What a filter runs: a registered name or a closure, plus its parameters.
#[derive(Debug, Clone)]
pub enum FilterKind {
    Named { name: String, params: Vec<Value> },
    Callable { callback: FilterCallback, params: Vec<Value> },
}

impl FilterKind {
    /// Registered name, or the callback label.
    pub fn name(&self) -> &str {
        match self {
            FilterKind::Named { name, .. } => name,
            FilterKind::Callable { callback, .. } => callback.label(),
        }
    }

    pub fn params(&self) -> &[Value] {
        match self {
            FilterKind::Named { params, .. } | FilterKind::Callable { params, .. } => params,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, FilterKind::Callable { .. })
    }
}

/// One entry of a view's filter list.
///
/// Priority filters run before queued ones and are expected to add or
/// remove rows.
#[derive(Debug, Clone)]
pub struct Filter {
    pub kind: FilterKind,
    pub priority: bool,
}

impl Filter {
    pub fn named(name: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            kind: FilterKind::Named {
                name: name.into(),
                params,
            },
            priority: false,
        }
    }

    pub fn callable(callback: FilterCallback, params: Vec<Value>) -> Self {
        Self {
            kind: FilterKind::Callable { callback, params },
            priority: false,
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: bool) -> Self {
        self.priority = priority;
        self
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// JSON description for property snapshots.
    pub fn describe(&self) -> Value {
        json!({
            "name": self.kind.name(),
            "callable": self.kind.is_callable(),
            "params": self.kind.params(),
            "priority": self.priority,
        })
    }
}

/// Split filters into (priority, queued), keeping declaration order inside
/// each group and dropping the priority flag.
pub fn partition_filters(filters: &[Filter]) -> (Vec<FilterKind>, Vec<FilterKind>) {
    let mut priority = Vec::new();
    let mut queued = Vec::new();
    for filter in filters {
        if filter.priority {
            priority.push(filter.kind.clone());
        } else {
            queued.push(filter.kind.clone());
        }
    }
    (priority, queued)
}
