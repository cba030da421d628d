//! Runs a view's filters over report rows.
//!
//! Order: priority filters, then generic filters derived from the request
//! (unless disabled), then queued filters (unless disabled).

use std::collections::BTreeMap;

use dataview_model::{
    DataTable, FilterCallback, FilterError, FilterKind, QueryParams, SortOrder, value_as_f64,
};
use regex::RegexBuilder;
use serde_json::Value;
use tracing::{debug, info_span};

use crate::request::VisualizationRequestConfig;
use crate::visualization::VisualizationDisplayConfig;

/// Named filter implementations.
#[derive(Debug, Clone)]
pub struct FilterRegistry {
    filters: BTreeMap<String, FilterCallback>,
}

impl Default for FilterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(FilterCallback::new("Sort", sort));
        registry.register(FilterCallback::new("Limit", limit));
        registry.register(FilterCallback::new("Pattern", pattern));
        registry.register(FilterCallback::new("ColumnDelete", column_delete));
        registry.register(FilterCallback::new(
            "ExcludeLowPopulation",
            exclude_low_population,
        ));
        registry
    }
}

impl FilterRegistry {
    /// Registry with the built-in filters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty() -> Self {
        Self {
            filters: BTreeMap::new(),
        }
    }

    /// Register a filter under its callback label, replacing any previous one.
    pub fn register(&mut self, callback: FilterCallback) {
        self.filters.insert(callback.label().to_string(), callback);
    }

    pub fn get(&self, name: &str) -> Option<&FilterCallback> {
        self.filters.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }

    /// Run a single filter step.
    pub fn run(&self, table: &mut DataTable, kind: &FilterKind) -> Result<(), FilterError> {
        match kind {
            FilterKind::Named { name, params } => {
                let callback = self.get(name).ok_or_else(|| FilterError::UnknownFilter {
                    name: name.clone(),
                })?;
                callback.call(table, params)
            }
            FilterKind::Callable { callback, params } => callback.call(table, params),
        }
    }
}

/// Counts of filters run per stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterRunSummary {
    pub priority: usize,
    pub generic: usize,
    pub queued: usize,
}

/// Apply the view's filters to `table`.
pub fn run_filters(
    table: &mut DataTable,
    view: &VisualizationDisplayConfig,
    request: &VisualizationRequestConfig,
    query: &QueryParams,
    registry: &FilterRegistry,
) -> Result<FilterRunSummary, FilterError> {
    let span = info_span!("filters", report_id = %view.report_id, rows = table.len());
    let _guard = span.enter();

    let (priority, queued) = view.filters_to_run();
    let mut summary = FilterRunSummary::default();

    for kind in &priority {
        run_step(registry, table, kind, "priority")?;
        summary.priority += 1;
    }

    if request.are_generic_filters_disabled(query) {
        debug!("generic filters disabled");
    } else {
        for kind in &request.generic_filters() {
            run_step(registry, table, kind, "generic")?;
            summary.generic += 1;
        }
    }

    if request.are_queued_filters_disabled() {
        debug!(skipped = queued.len(), "queued filters disabled");
    } else {
        for kind in &queued {
            run_step(registry, table, kind, "queued")?;
            summary.queued += 1;
        }
    }

    debug!(
        priority = summary.priority,
        generic = summary.generic,
        queued = summary.queued,
        rows = table.len(),
        "filters applied"
    );
    Ok(summary)
}

fn run_step(
    registry: &FilterRegistry,
    table: &mut DataTable,
    kind: &FilterKind,
    stage: &'static str,
) -> Result<(), FilterError> {
    let before = table.len();
    registry.run(table, kind)?;
    debug!(filter = kind.name(), stage, before, after = table.len(), "ran filter");
    Ok(())
}

fn str_param<'a>(filter: &str, params: &'a [Value], idx: usize) -> Result<&'a str, FilterError> {
    params
        .get(idx)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            FilterError::invalid_parameter(filter, format!("parameter {idx} must be a string"))
        })
}

fn int_param(filter: &str, params: &[Value], idx: usize) -> Result<Option<i64>, FilterError> {
    match params.get(idx) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value_as_f64(value)
            .filter(|v| v.fract() == 0.0)
            .map(|v| Some(v as i64))
            .ok_or_else(|| {
                FilterError::invalid_parameter(filter, format!("parameter {idx} must be an integer"))
            }),
    }
}

/// `Sort(column, order = "desc")`
fn sort(table: &mut DataTable, params: &[Value]) -> Result<(), FilterError> {
    let column = str_param("Sort", params, 0)?;
    let order = match params.get(1).and_then(Value::as_str) {
        Some(raw) => SortOrder::parse(raw)
            .ok_or_else(|| FilterError::invalid_parameter("Sort", format!("unknown order {raw}")))?,
        None => SortOrder::Desc,
    };
    table.sort_by_column(column, order);
    Ok(())
}

/// `Limit(offset, limit = -1)`
fn limit(table: &mut DataTable, params: &[Value]) -> Result<(), FilterError> {
    let offset = int_param("Limit", params, 0)?.unwrap_or(0);
    let offset = usize::try_from(offset)
        .map_err(|_| FilterError::invalid_parameter("Limit", "offset must not be negative"))?;
    let limit = int_param("Limit", params, 1)?.unwrap_or(-1);
    table.slice(offset, limit);
    Ok(())
}

/// `Pattern(column, regex)`: keep rows whose column matches, case-insensitive.
fn pattern(table: &mut DataTable, params: &[Value]) -> Result<(), FilterError> {
    let column = str_param("Pattern", params, 0)?;
    let expression = str_param("Pattern", params, 1)?;
    let regex = RegexBuilder::new(expression)
        .case_insensitive(true)
        .build()
        .map_err(|e| FilterError::invalid_parameter("Pattern", e.to_string()))?;
    table.retain(|row| row.text(column).is_some_and(|text| regex.is_match(&text)));
    Ok(())
}

/// `ColumnDelete(column, ...)`
fn column_delete(table: &mut DataTable, params: &[Value]) -> Result<(), FilterError> {
    let columns = (0..params.len())
        .map(|idx| str_param("ColumnDelete", params, idx).map(str::to_string))
        .collect::<Result<Vec<_>, _>>()?;
    table.delete_columns(&columns);
    Ok(())
}

/// `ExcludeLowPopulation(column, minimum)`: drop rows below the minimum.
fn exclude_low_population(table: &mut DataTable, params: &[Value]) -> Result<(), FilterError> {
    let column = str_param("ExcludeLowPopulation", params, 0)?;
    let minimum = params.get(1).and_then(value_as_f64).ok_or_else(|| {
        FilterError::invalid_parameter("ExcludeLowPopulation", "parameter 1 must be a number")
    })?;
    table.retain(|row| {
        row.get(column)
            .and_then(value_as_f64)
            .is_some_and(|value| value >= minimum)
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use dataview_model::Row;
    use serde_json::json;

    use super::*;

    fn table() -> DataTable {
        DataTable::new(vec![
            Row::new().with("label", "google").with("nb_visits", 40),
            Row::new().with("label", "Bing").with("nb_visits", 3),
            Row::new().with("label", "duckduckgo").with("nb_visits", 12),
        ])
    }

    fn named(name: &str, params: Vec<Value>) -> FilterKind {
        FilterKind::Named {
            name: name.to_string(),
            params,
        }
    }

    #[test]
    fn builtins_are_registered() {
        let registry = FilterRegistry::new();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(
            names,
            vec!["ColumnDelete", "ExcludeLowPopulation", "Limit", "Pattern", "Sort"]
        );
    }

    #[test]
    fn pattern_is_case_insensitive() {
        let mut t = table();
        FilterRegistry::new()
            .run(&mut t, &named("Pattern", vec![json!("label"), json!("^b")]))
            .unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.rows()[0].label(), Some("Bing"));
    }

    #[test]
    fn invalid_regex_is_reported() {
        let err = FilterRegistry::new()
            .run(&mut table(), &named("Pattern", vec![json!("label"), json!("(")]))
            .unwrap_err();
        assert!(matches!(err, FilterError::InvalidParameter { .. }));
    }

    #[test]
    fn exclude_low_population_drops_small_rows() {
        let mut t = table();
        FilterRegistry::new()
            .run(
                &mut t,
                &named("ExcludeLowPopulation", vec![json!("nb_visits"), json!(10)]),
            )
            .unwrap();
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn column_delete_removes_columns() {
        let mut t = table();
        FilterRegistry::new()
            .run(&mut t, &named("ColumnDelete", vec![json!("nb_visits")]))
            .unwrap();
        assert!(!t.has_column("nb_visits"));
    }

    #[test]
    fn unknown_filter_is_an_error() {
        let err = FilterRegistry::new()
            .run(&mut table(), &named("Truncate", vec![]))
            .unwrap_err();
        assert_eq!(
            err,
            FilterError::UnknownFilter {
                name: "Truncate".to_string()
            }
        );
    }

    #[test]
    fn limit_rejects_fractional_and_negative_offsets() {
        let registry = FilterRegistry::new();
        assert!(registry
            .run(&mut table(), &named("Limit", vec![json!(1.5)]))
            .is_err());
        assert!(registry
            .run(&mut table(), &named("Limit", vec![json!(-1)]))
            .is_err());
    }
}
