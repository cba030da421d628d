//! Display properties for visualizations (tables, graphs, tag clouds).

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use dataview_model::{
    Filter, FilterCallback, FilterKind, ModelError, Property, PropertyList, PropertySnapshot,
    QueryParams, Translator, parse_bool, partition_filters,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::display::BaseDisplayConfig;
use crate::properties::{DisplayProperties, optional_text, put};
use crate::settings::Settings;
use crate::url::report_url;

/// Visualization toggles that can be overridden from the query string.
pub const VISUALIZATION_OVERRIDABLE_PROPERTIES: [Property; 20] = [
    Property::ShowGoals,
    Property::ShowExcludeLowPopulation,
    Property::ShowFlattenTable,
    Property::ShowTable,
    Property::ShowTableAllColumns,
    Property::ShowActiveViewIcon,
    Property::ShowRelatedReports,
    Property::ShowLimitControl,
    Property::ShowSearch,
    Property::EnableSort,
    Property::ShowBarChart,
    Property::ShowPieChart,
    Property::ShowTagCloud,
    Property::ShowExportAsRssFeed,
    Property::ShowEcommerce,
    Property::SearchRecursive,
    Property::ShowExportAsImageIcon,
    Property::ShowPaginationControl,
    Property::ShowOffsetInformation,
    Property::HideAnnotationsView,
];

/// A report listed below the view, keyed by its URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedReport {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct VisualizationDisplayConfig {
    pub base: BaseDisplayConfig,
    /// Show only the visualization, without the surrounding controls.
    pub show_visualization_only: bool,
    pub show_goals: bool,
    pub show_exclude_low_population: bool,
    pub show_flatten_table: bool,
    pub show_table: bool,
    pub show_table_all_columns: bool,
    /// Caret over the active view icon.
    pub show_active_view_icon: bool,
    pub related_reports: Vec<RelatedReport>,
    /// Report heading. Required when related reports are present.
    pub title: String,
    pub show_related_reports: bool,
    /// Extra data handed to the browser-side table class.
    pub custom_parameters: BTreeMap<String, Value>,
    pub show_limit_control: bool,
    pub show_search: bool,
    pub enable_sort: bool,
    pub show_bar_chart: bool,
    pub show_pie_chart: bool,
    pub show_tag_cloud: bool,
    pub show_export_as_rss_feed: bool,
    pub show_ecommerce: bool,
    pub show_footer_message: Option<String>,
    pub tooltip_metadata_name: Option<String>,
    pub datatable_css_class: Option<String>,
    pub datatable_js_type: String,
    /// Search through subtables as well.
    pub search_recursive: bool,
    pub y_axis_unit: Option<String>,
    pub show_export_as_image_icon: bool,
    pub filters: Vec<Filter>,
    pub show_pagination_control: bool,
    pub show_offset_information: bool,
    pub hide_annotations_view: bool,
    pub report_last_updated_message: Option<String>,
    pub metadata: BTreeMap<String, Value>,
}

impl VisualizationDisplayConfig {
    pub fn new(settings: &Settings, translator: &dyn Translator) -> Self {
        let mut base = BaseDisplayConfig::new(settings, translator);
        base.add_properties_that_can_be_overwritten_by_query_params(
            VISUALIZATION_OVERRIDABLE_PROPERTIES,
        );
        base.add_properties_that_should_be_available_client_side([Property::ShowLimitControl]);

        Self {
            base,
            show_visualization_only: false,
            show_goals: false,
            show_exclude_low_population: true,
            show_flatten_table: true,
            show_table: true,
            show_table_all_columns: true,
            show_active_view_icon: true,
            related_reports: Vec::new(),
            title: String::new(),
            show_related_reports: true,
            custom_parameters: BTreeMap::new(),
            show_limit_control: true,
            show_search: true,
            enable_sort: true,
            show_bar_chart: true,
            show_pie_chart: true,
            show_tag_cloud: true,
            show_export_as_rss_feed: true,
            show_ecommerce: false,
            show_footer_message: None,
            tooltip_metadata_name: None,
            datatable_css_class: None,
            datatable_js_type: "DataTable".to_string(),
            search_recursive: false,
            y_axis_unit: None,
            show_export_as_image_icon: false,
            filters: Vec::new(),
            show_pagination_control: true,
            show_offset_information: true,
            hide_annotations_view: true,
            report_last_updated_message: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn add_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    pub fn add_named_filter(
        &mut self,
        name: impl Into<String>,
        params: Vec<Value>,
        priority: bool,
    ) {
        self.add_filter(Filter::named(name, params).with_priority(priority));
    }

    pub fn add_callable_filter(&mut self, callback: FilterCallback, priority: bool) {
        self.add_filter(Filter::callable(callback, Vec::new()).with_priority(priority));
    }

    /// Filters split into (priority, queued), declaration order kept within
    /// each group.
    pub fn filters_to_run(&self) -> (Vec<FilterKind>, Vec<FilterKind>) {
        partition_filters(&self.filters)
    }

    /// List another report below this one.
    ///
    /// `report_id` is `"Module.action"`. A report pointing at this view's
    /// own controller action is skipped without error.
    pub fn add_related_report(
        &mut self,
        report_id: &str,
        title: impl Into<String>,
        params: &QueryParams,
        current: &QueryParams,
    ) -> Result<(), ModelError> {
        let (module, action) = split_report_id(report_id)?;

        if self.base.is_controller(module, action) {
            debug!(report_id, "skipping related report that references this report");
            return Ok(());
        }

        let url = report_url(module, action, params, current);
        let title = title.into();
        match self.related_reports.iter_mut().find(|r| r.url == url) {
            Some(existing) => existing.title = title,
            None => self.related_reports.push(RelatedReport { url, title }),
        }
        Ok(())
    }

    pub fn add_related_reports<'a, I>(
        &mut self,
        reports: I,
        current: &QueryParams,
    ) -> Result<(), ModelError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let no_params = QueryParams::new();
        for (report_id, title) in reports {
            self.add_related_report(report_id, title, &no_params, current)?;
        }
        Ok(())
    }
}

/// Split `"Module.action"` into its parts.
pub fn split_report_id(report_id: &str) -> Result<(&str, &str), ModelError> {
    let mut parts = report_id.split('.');
    match (parts.next(), parts.next()) {
        (Some(module), Some(action)) if !module.is_empty() && !action.is_empty() => {
            Ok((module, action))
        }
        _ => Err(ModelError::MalformedReportId {
            report_id: report_id.to_string(),
        }),
    }
}

impl Deref for VisualizationDisplayConfig {
    type Target = BaseDisplayConfig;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl DerefMut for VisualizationDisplayConfig {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}

impl DisplayProperties for VisualizationDisplayConfig {
    fn overridable_properties(&self) -> &PropertyList {
        &self.base.overridable_properties
    }

    fn client_side_properties(&self) -> &PropertyList {
        &self.base.client_side_properties
    }

    fn set_property(&mut self, property: Property, raw: &str) -> Result<bool, ModelError> {
        let name = property.as_str();
        let flag = match property {
            Property::ShowVisualizationOnly => &mut self.show_visualization_only,
            Property::ShowGoals => &mut self.show_goals,
            Property::ShowExcludeLowPopulation => &mut self.show_exclude_low_population,
            Property::ShowFlattenTable => &mut self.show_flatten_table,
            Property::ShowTable => &mut self.show_table,
            Property::ShowTableAllColumns => &mut self.show_table_all_columns,
            Property::ShowActiveViewIcon => &mut self.show_active_view_icon,
            Property::ShowRelatedReports => &mut self.show_related_reports,
            Property::ShowLimitControl => &mut self.show_limit_control,
            Property::ShowSearch => &mut self.show_search,
            Property::EnableSort => &mut self.enable_sort,
            Property::ShowBarChart => &mut self.show_bar_chart,
            Property::ShowPieChart => &mut self.show_pie_chart,
            Property::ShowTagCloud => &mut self.show_tag_cloud,
            Property::ShowExportAsRssFeed => &mut self.show_export_as_rss_feed,
            Property::ShowEcommerce => &mut self.show_ecommerce,
            Property::SearchRecursive => &mut self.search_recursive,
            Property::ShowExportAsImageIcon => &mut self.show_export_as_image_icon,
            Property::ShowPaginationControl => &mut self.show_pagination_control,
            Property::ShowOffsetInformation => &mut self.show_offset_information,
            Property::HideAnnotationsView => &mut self.hide_annotations_view,
            Property::Title => {
                self.title = raw.to_string();
                return Ok(true);
            }
            Property::ShowFooterMessage => {
                self.show_footer_message = optional_text(raw);
                return Ok(true);
            }
            Property::TooltipMetadataName => {
                self.tooltip_metadata_name = optional_text(raw);
                return Ok(true);
            }
            Property::DatatableCssClass => {
                self.datatable_css_class = optional_text(raw);
                return Ok(true);
            }
            Property::DatatableJsType => {
                self.datatable_js_type = raw.to_string();
                return Ok(true);
            }
            Property::YAxisUnit => {
                self.y_axis_unit = optional_text(raw);
                return Ok(true);
            }
            Property::ReportLastUpdatedMessage => {
                self.report_last_updated_message = optional_text(raw);
                return Ok(true);
            }
            _ => return self.base.set_property(property, raw),
        };
        *flag = parse_bool(name, raw)?;
        Ok(true)
    }

    fn properties(&self) -> PropertySnapshot {
        let mut snapshot = self.base.properties();
        let related: BTreeMap<&str, &str> = self
            .related_reports
            .iter()
            .map(|r| (r.url.as_str(), r.title.as_str()))
            .collect();
        let filters: Vec<Value> = self.filters.iter().map(Filter::describe).collect();

        put(&mut snapshot, Property::ShowVisualizationOnly, self.show_visualization_only);
        put(&mut snapshot, Property::ShowGoals, self.show_goals);
        put(
            &mut snapshot,
            Property::ShowExcludeLowPopulation,
            self.show_exclude_low_population,
        );
        put(&mut snapshot, Property::ShowFlattenTable, self.show_flatten_table);
        put(&mut snapshot, Property::ShowTable, self.show_table);
        put(&mut snapshot, Property::ShowTableAllColumns, self.show_table_all_columns);
        put(&mut snapshot, Property::ShowActiveViewIcon, self.show_active_view_icon);
        put(&mut snapshot, Property::RelatedReports, json!(related));
        put(&mut snapshot, Property::Title, self.title.as_str());
        put(&mut snapshot, Property::ShowRelatedReports, self.show_related_reports);
        put(&mut snapshot, Property::CustomParameters, json!(self.custom_parameters));
        put(&mut snapshot, Property::ShowLimitControl, self.show_limit_control);
        put(&mut snapshot, Property::ShowSearch, self.show_search);
        put(&mut snapshot, Property::EnableSort, self.enable_sort);
        put(&mut snapshot, Property::ShowBarChart, self.show_bar_chart);
        put(&mut snapshot, Property::ShowPieChart, self.show_pie_chart);
        put(&mut snapshot, Property::ShowTagCloud, self.show_tag_cloud);
        put(&mut snapshot, Property::ShowExportAsRssFeed, self.show_export_as_rss_feed);
        put(&mut snapshot, Property::ShowEcommerce, self.show_ecommerce);
        put(&mut snapshot, Property::ShowFooterMessage, json!(self.show_footer_message));
        put(
            &mut snapshot,
            Property::TooltipMetadataName,
            json!(self.tooltip_metadata_name),
        );
        put(&mut snapshot, Property::DatatableCssClass, json!(self.datatable_css_class));
        put(&mut snapshot, Property::DatatableJsType, self.datatable_js_type.as_str());
        put(&mut snapshot, Property::SearchRecursive, self.search_recursive);
        put(&mut snapshot, Property::YAxisUnit, json!(self.y_axis_unit));
        put(
            &mut snapshot,
            Property::ShowExportAsImageIcon,
            self.show_export_as_image_icon,
        );
        put(&mut snapshot, Property::Filters, Value::Array(filters));
        put(
            &mut snapshot,
            Property::ShowPaginationControl,
            self.show_pagination_control,
        );
        put(
            &mut snapshot,
            Property::ShowOffsetInformation,
            self.show_offset_information,
        );
        put(&mut snapshot, Property::HideAnnotationsView, self.hide_annotations_view);
        put(
            &mut snapshot,
            Property::ReportLastUpdatedMessage,
            json!(self.report_last_updated_message),
        );
        put(&mut snapshot, Property::Metadata, json!(self.metadata));
        snapshot
    }
}
