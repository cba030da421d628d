//! Request-side configuration: the API parameters a view fetches data with.

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use dataview_model::{
    FilterKind, ModelError, Property, PropertyList, PropertySnapshot, QueryParams, SortOrder,
    loosely_equals_one, parse_bool, parse_int,
};
use serde_json::json;

use crate::properties::{DisplayProperties, optional_text, put};

const REQUEST_OVERRIDABLE_PROPERTIES: [Property; 7] = [
    Property::FilterLimit,
    Property::FilterOffset,
    Property::FilterSortColumn,
    Property::FilterSortOrder,
    Property::FilterPattern,
    Property::FilterColumn,
    Property::Flat,
];

/// Paging, sorting and search parameters for the report request.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub overridable_properties: PropertyList,
    pub filter_limit: Option<i64>,
    pub filter_offset: i64,
    pub filter_sort_column: Option<String>,
    pub filter_sort_order: SortOrder,
    pub filter_pattern: Option<String>,
    pub filter_column: String,
    /// Request the flattened report instead of the hierarchical one.
    pub flat: bool,
    client_side_properties: PropertyList,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            overridable_properties: PropertyList::from(REQUEST_OVERRIDABLE_PROPERTIES),
            filter_limit: None,
            filter_offset: 0,
            filter_sort_column: None,
            filter_sort_order: SortOrder::Desc,
            filter_pattern: None,
            filter_column: "label".to_string(),
            flat: false,
            client_side_properties: PropertyList::new(),
        }
    }
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_properties_that_can_be_overwritten_by_query_params<I>(&mut self, properties: I)
    where
        I: IntoIterator<Item = Property>,
    {
        self.overridable_properties.extend(properties);
    }

    /// Generic filters implied by these parameters, in run order: pattern,
    /// sort, limit.
    pub fn generic_filters(&self) -> Vec<FilterKind> {
        let mut filters = Vec::new();
        if let Some(pattern) = &self.filter_pattern {
            filters.push(FilterKind::Named {
                name: "Pattern".to_string(),
                params: vec![json!(self.filter_column), json!(pattern)],
            });
        }
        if let Some(column) = &self.filter_sort_column {
            filters.push(FilterKind::Named {
                name: "Sort".to_string(),
                params: vec![json!(column), json!(self.filter_sort_order.as_str())],
            });
        }
        if self.filter_limit.is_some() || self.filter_offset > 0 {
            filters.push(FilterKind::Named {
                name: "Limit".to_string(),
                params: vec![json!(self.filter_offset), json!(self.filter_limit.unwrap_or(-1))],
            });
        }
        filters
    }
}

impl DisplayProperties for RequestConfig {
    fn overridable_properties(&self) -> &PropertyList {
        &self.overridable_properties
    }

    fn client_side_properties(&self) -> &PropertyList {
        &self.client_side_properties
    }

    fn set_property(&mut self, property: Property, raw: &str) -> Result<bool, ModelError> {
        let name = property.as_str();
        match property {
            Property::FilterLimit => self.filter_limit = Some(parse_int(name, raw)?),
            Property::FilterOffset => {
                let offset = parse_int(name, raw)?;
                if offset < 0 {
                    return Err(ModelError::InvalidPropertyValue {
                        property: name.to_string(),
                        value: raw.to_string(),
                        expected: "a non-negative integer",
                    });
                }
                self.filter_offset = offset;
            }
            Property::FilterSortColumn => self.filter_sort_column = optional_text(raw),
            Property::FilterSortOrder => {
                self.filter_sort_order =
                    SortOrder::parse(raw).ok_or_else(|| ModelError::InvalidPropertyValue {
                        property: name.to_string(),
                        value: raw.to_string(),
                        expected: "asc or desc",
                    })?;
            }
            Property::FilterPattern => self.filter_pattern = optional_text(raw),
            Property::FilterColumn => {
                if let Some(column) = optional_text(raw) {
                    self.filter_column = column;
                }
            }
            Property::Flat => self.flat = parse_bool(name, raw)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn properties(&self) -> PropertySnapshot {
        let mut snapshot = PropertySnapshot::new();
        snapshot.insert(
            "overridable_properties".to_string(),
            json!(self.overridable_properties.names()),
        );
        put(&mut snapshot, Property::FilterLimit, json!(self.filter_limit));
        put(&mut snapshot, Property::FilterOffset, self.filter_offset);
        put(&mut snapshot, Property::FilterSortColumn, json!(self.filter_sort_column));
        put(&mut snapshot, Property::FilterSortOrder, self.filter_sort_order.as_str());
        put(&mut snapshot, Property::FilterPattern, json!(self.filter_pattern));
        put(&mut snapshot, Property::FilterColumn, self.filter_column.as_str());
        put(&mut snapshot, Property::Flat, self.flat);
        snapshot
    }
}

/// Request config of a visualization, with switches for the filter stages.
#[derive(Debug, Clone)]
pub struct VisualizationRequestConfig {
    pub base: RequestConfig,
    /// API parameter overrides, e.g. `period=month`.
    pub request_parameters_to_modify: BTreeMap<String, String>,
    pub disable_generic_filters: bool,
    /// Priority filters run regardless.
    pub disable_queued_filters: bool,
}

impl Default for VisualizationRequestConfig {
    fn default() -> Self {
        let mut base = RequestConfig::new();
        base.add_properties_that_can_be_overwritten_by_query_params([
            Property::DisableGenericFilters,
            Property::DisableQueuedFilters,
        ]);
        Self {
            base,
            request_parameters_to_modify: BTreeMap::new(),
            disable_generic_filters: false,
            disable_queued_filters: false,
        }
    }
}

impl VisualizationRequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the config field is consulted.
    pub fn are_queued_filters_disabled(&self) -> bool {
        self.disable_queued_filters
    }

    /// True when the request carries `disable_generic_filters` equal to 1,
    /// or the config field is set.
    pub fn are_generic_filters_disabled(&self, request: &QueryParams) -> bool {
        if request
            .get("disable_generic_filters")
            .is_some_and(loosely_equals_one)
        {
            return true;
        }
        self.disable_generic_filters
    }
}

impl Deref for VisualizationRequestConfig {
    type Target = RequestConfig;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl DerefMut for VisualizationRequestConfig {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}

impl DisplayProperties for VisualizationRequestConfig {
    fn overridable_properties(&self) -> &PropertyList {
        &self.base.overridable_properties
    }

    fn client_side_properties(&self) -> &PropertyList {
        self.base.client_side_properties()
    }

    fn set_property(&mut self, property: Property, raw: &str) -> Result<bool, ModelError> {
        let name = property.as_str();
        match property {
            Property::DisableGenericFilters => {
                self.disable_generic_filters = parse_bool(name, raw)?;
            }
            Property::DisableQueuedFilters => {
                self.disable_queued_filters = parse_bool(name, raw)?;
            }
            _ => return self.base.set_property(property, raw),
        }
        Ok(true)
    }

    fn properties(&self) -> PropertySnapshot {
        let mut snapshot = self.base.properties();
        put(
            &mut snapshot,
            Property::RequestParametersToModify,
            json!(self.request_parameters_to_modify),
        );
        put(&mut snapshot, Property::DisableGenericFilters, self.disable_generic_filters);
        put(&mut snapshot, Property::DisableQueuedFilters, self.disable_queued_filters);
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_filters_disabled_by_request_or_field() {
        let config = VisualizationRequestConfig::new();
        assert!(!config.are_generic_filters_disabled(&QueryParams::new()));
        assert!(config.are_generic_filters_disabled(&QueryParams::parse("disable_generic_filters=1")));
        assert!(!config.are_generic_filters_disabled(&QueryParams::parse("disable_generic_filters=0")));

        let mut config = VisualizationRequestConfig::new();
        config.disable_generic_filters = true;
        assert!(config.are_generic_filters_disabled(&QueryParams::new()));
        assert!(config.are_generic_filters_disabled(&QueryParams::parse("disable_generic_filters=0")));
    }

    #[test]
    fn queued_filters_ignore_the_request() {
        let config = VisualizationRequestConfig::new();
        assert!(!config.are_queued_filters_disabled());

        let mut overridden = VisualizationRequestConfig::new();
        overridden.apply_query_params(&QueryParams::parse("disable_queued_filters=1"));
        assert!(overridden.are_queued_filters_disabled());
    }

    #[test]
    fn request_overrides_parse_paging_and_sorting() {
        let mut config = VisualizationRequestConfig::new();
        let applied = config.apply_query_params(&QueryParams::parse(
            "filter_limit=10&filter_offset=20&filter_sort_column=nb_visits&filter_sort_order=asc&flat=1",
        ));
        assert_eq!(applied, 5);
        assert_eq!(config.filter_limit, Some(10));
        assert_eq!(config.filter_offset, 20);
        assert_eq!(config.filter_sort_order, SortOrder::Asc);
        assert!(config.flat);
    }

    #[test]
    fn negative_offset_is_rejected() {
        let mut config = RequestConfig::new();
        config.apply_query_params(&QueryParams::parse("filter_offset=-5"));
        assert_eq!(config.filter_offset, 0);
    }

    #[test]
    fn generic_filters_follow_parameters() {
        let mut config = RequestConfig::new();
        assert!(config.generic_filters().is_empty());

        config.filter_pattern = Some("^google".to_string());
        config.filter_sort_column = Some("nb_visits".to_string());
        config.filter_limit = Some(5);
        let names: Vec<_> = config
            .generic_filters()
            .iter()
            .map(|kind| kind.name().to_string())
            .collect();
        assert_eq!(names, vec!["Pattern", "Sort", "Limit"]);
    }

    #[test]
    fn snapshot_includes_inherited_fields() {
        let snapshot = VisualizationRequestConfig::new().properties();
        for key in ["filter_limit", "flat", "disable_generic_filters", "disable_queued_filters"] {
            assert!(snapshot.contains_key(key), "missing {key}");
        }
    }
}
