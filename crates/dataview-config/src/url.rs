//! Canonical report URLs.

use dataview_model::QueryParams;

/// Query parameters consumed by the generic filters. They are stripped from
/// report URLs so a linked report starts unfiltered.
pub const GENERIC_FILTER_PARAMETERS: &[&str] = &[
    "filter_column",
    "filter_pattern",
    "filter_column_recursive",
    "filter_pattern_recursive",
    "filter_excludelowpop",
    "filter_excludelowpop_value",
    "filter_add_columns_when_show_all_columns",
    "filter_update_columns_when_show_all_goals",
    "idGoal",
    "filter_sort_column",
    "filter_sort_order",
    "filter_truncate",
    "filter_offset",
    "filter_limit",
    "keep_summary_row",
];

/// URL of `module`/`action` derived from the current request.
///
/// The current query is kept, `params` and the module/action are laid over
/// it, and generic filter parameters are removed.
pub fn report_url(
    module: &str,
    action: &str,
    params: &QueryParams,
    current: &QueryParams,
) -> String {
    let mut merged = current.clone();
    for (name, value) in params.iter() {
        merged.insert(name, value);
    }
    merged.insert("module", module);
    merged.insert("action", action);
    for name in GENERIC_FILTER_PARAMETERS {
        merged.remove(name);
    }
    format!("index.php?{}", merged.to_query_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_context_and_drops_generic_filters() {
        let current = QueryParams::parse(
            "module=Referrers&action=getKeywords&idSite=1&period=day&date=today&filter_limit=10&filter_sort_column=nb_visits",
        );
        let params = QueryParams::new().with("viewDataTable", "table");
        let url = report_url("Referrers", "getSearchEngines", &params, &current);
        assert_eq!(
            url,
            "index.php?action=getSearchEngines&date=today&idSite=1&module=Referrers&period=day&viewDataTable=table"
        );
    }

    #[test]
    fn caller_cannot_reintroduce_generic_filters() {
        let params = QueryParams::new().with("filter_offset", "20");
        let url = report_url("Actions", "getPageUrls", &params, &QueryParams::new());
        assert_eq!(url, "index.php?action=getPageUrls&module=Actions");
    }
}
