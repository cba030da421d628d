//! End-to-end filter runs over a small keyword report.

use dataview_config::{
    DisplayProperties, FilterRegistry, FilterRunSummary, Settings, VisualizationDisplayConfig,
    VisualizationRequestConfig, run_filters,
};
use dataview_model::{
    DataTable, DefaultTranslator, FilterCallback, FilterError, QueryParams, Row,
};
use serde_json::json;

fn keywords() -> DataTable {
    DataTable::new(vec![
        Row::new().with("label", "rust tutorial").with("nb_visits", 50),
        Row::new().with("label", "rust book").with("nb_visits", 20),
        Row::new().with("label", "Rust async").with("nb_visits", 35),
        Row::new().with("label", "go channels").with("nb_visits", 80),
        Row::new().with("label", "rust").with("nb_visits", 2),
    ])
}

fn labels(table: &DataTable) -> Vec<&str> {
    table.rows().iter().filter_map(Row::label).collect()
}

fn view() -> VisualizationDisplayConfig {
    let mut view =
        VisualizationDisplayConfig::new(&Settings::default(), &DefaultTranslator::new());
    view.set_controller(
        "Referrers",
        "getKeywords",
        &dataview_model::StaticMetadata::new(),
    );
    view
}

#[test]
fn stages_run_in_order() {
    let query = QueryParams::parse(
        "filter_pattern=^rust&filter_sort_column=nb_visits&filter_limit=3",
    );
    let mut view = view();
    view.add_named_filter(
        "ExcludeLowPopulation",
        vec![json!("nb_visits"), json!(5)],
        true,
    );
    view.add_named_filter("ColumnDelete", vec![json!("nb_visits")], false);
    let mut request = VisualizationRequestConfig::new();
    request.apply_query_params(&query);

    let mut table = keywords();
    let summary =
        run_filters(&mut table, &view, &request, &query, &FilterRegistry::new()).unwrap();

    assert_eq!(
        summary,
        FilterRunSummary {
            priority: 1,
            generic: 3,
            queued: 1,
        }
    );
    assert_eq!(labels(&table), vec!["rust tutorial", "Rust async", "rust book"]);
    assert!(!table.has_column("nb_visits"));
}

#[test]
fn generic_filters_can_be_disabled_from_the_request() {
    let query = QueryParams::parse("filter_limit=1&disable_generic_filters=1");
    let view = view();
    let mut request = VisualizationRequestConfig::new();
    request.apply_query_params(&query);

    let mut table = keywords();
    let summary =
        run_filters(&mut table, &view, &request, &query, &FilterRegistry::new()).unwrap();
    assert_eq!(summary.generic, 0);
    assert_eq!(table.len(), 5);
}

#[test]
fn disabling_queued_filters_keeps_priority_filters() {
    let query = QueryParams::parse("disable_queued_filters=1");
    let mut view = view();
    view.add_named_filter("Limit", vec![json!(0), json!(2)], true);
    view.add_named_filter("Limit", vec![json!(0), json!(1)], false);
    let mut request = VisualizationRequestConfig::new();
    request.apply_query_params(&query);

    let mut table = keywords();
    let summary =
        run_filters(&mut table, &view, &request, &query, &FilterRegistry::new()).unwrap();
    assert_eq!(summary.priority, 1);
    assert_eq!(summary.queued, 0);
    assert_eq!(table.len(), 2);
}

#[test]
fn callable_filters_run_with_their_params() {
    let mut view = view();
    view.add_callable_filter(
        FilterCallback::new("drop_go", |table, _| {
            table.retain(|row| row.label().is_some_and(|label| !label.starts_with("go")));
            Ok(())
        }),
        false,
    );
    let request = VisualizationRequestConfig::new();
    let mut table = keywords();
    run_filters(
        &mut table,
        &view,
        &request,
        &QueryParams::new(),
        &FilterRegistry::new(),
    )
    .unwrap();
    assert_eq!(table.len(), 4);
}

#[test]
fn failing_callable_filter_stops_the_run() {
    let mut view = view();
    view.add_callable_filter(
        FilterCallback::new("require_goals", |table, _| {
            if table.has_column("goals") {
                Ok(())
            } else {
                Err(FilterError::failed("require_goals", "no goals column"))
            }
        }),
        true,
    );
    view.add_named_filter("ColumnDelete", vec![json!("nb_visits")], false);
    let request = VisualizationRequestConfig::new();
    let mut table = keywords();
    let err = run_filters(
        &mut table,
        &view,
        &request,
        &QueryParams::new(),
        &FilterRegistry::new(),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "filter require_goals failed: no goals column");
    assert!(table.has_column("nb_visits"));
}

#[test]
fn unknown_named_filter_stops_the_run() {
    let mut view = view();
    view.add_named_filter("Truncate", vec![json!(10)], true);
    let request = VisualizationRequestConfig::new();
    let mut table = keywords();
    let err = run_filters(
        &mut table,
        &view,
        &request,
        &QueryParams::new(),
        &FilterRegistry::new(),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "unknown filter: Truncate");
}
