//! Display property identifiers and tag lists.
//!
//! Every configurable field of a report view has a [`Property`] identifier.
//! Configs track which fields are exposed to the browser and which can be set
//! from the query string as [`PropertyList`]s of these identifiers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Snapshot of config values keyed by property name.
pub type PropertySnapshot = BTreeMap<String, serde_json::Value>;

macro_rules! define_properties {
    ($($variant:ident => $name:literal,)+) => {
        /// Identifier of a display or request property.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum Property {
            $($variant,)+
        }

        impl Property {
            /// All known properties in declaration order.
            pub const ALL: &'static [Property] = &[$(Property::$variant,)+];

            /// Wire name used in query strings and snapshots.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Property::$variant => $name,)+
                }
            }

            /// Look up a property by its wire name.
            pub fn parse(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Property::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

define_properties! {
    // Base display properties
    FooterIcons => "footer_icons",
    Translations => "translations",
    ShowFooter => "show_footer",
    ShowFooterIcons => "show_footer_icons",
    ColumnsToDisplay => "columns_to_display",
    ShowAllViewsIcons => "show_all_views_icons",
    Documentation => "documentation",
    MetricsDocumentation => "metrics_documentation",
    SelfUrl => "self_url",
    SubtableControllerAction => "subtable_controller_action",
    ExportLimit => "export_limit",
    ReportId => "report_id",
    ControllerName => "controller_name",
    ControllerAction => "controller_action",
    // Visualization properties
    ShowVisualizationOnly => "show_visualization_only",
    ShowGoals => "show_goals",
    ShowExcludeLowPopulation => "show_exclude_low_population",
    ShowFlattenTable => "show_flatten_table",
    ShowTable => "show_table",
    ShowTableAllColumns => "show_table_all_columns",
    ShowActiveViewIcon => "show_active_view_icon",
    RelatedReports => "related_reports",
    Title => "title",
    ShowRelatedReports => "show_related_reports",
    CustomParameters => "custom_parameters",
    ShowLimitControl => "show_limit_control",
    ShowSearch => "show_search",
    EnableSort => "enable_sort",
    ShowBarChart => "show_bar_chart",
    ShowPieChart => "show_pie_chart",
    ShowTagCloud => "show_tag_cloud",
    ShowExportAsRssFeed => "show_export_as_rss_feed",
    ShowEcommerce => "show_ecommerce",
    ShowFooterMessage => "show_footer_message",
    TooltipMetadataName => "tooltip_metadata_name",
    DatatableCssClass => "datatable_css_class",
    DatatableJsType => "datatable_js_type",
    SearchRecursive => "search_recursive",
    YAxisUnit => "y_axis_unit",
    ShowExportAsImageIcon => "show_export_as_image_icon",
    Filters => "filters",
    ShowPaginationControl => "show_pagination_control",
    ShowOffsetInformation => "show_offset_information",
    HideAnnotationsView => "hide_annotations_view",
    ReportLastUpdatedMessage => "report_last_updated_message",
    Metadata => "metadata",
    // Request properties
    FilterLimit => "filter_limit",
    FilterOffset => "filter_offset",
    FilterSortColumn => "filter_sort_column",
    FilterSortOrder => "filter_sort_order",
    FilterPattern => "filter_pattern",
    FilterColumn => "filter_column",
    Flat => "flat",
    RequestParametersToModify => "request_parameters_to_modify",
    DisableGenericFilters => "disable_generic_filters",
    DisableQueuedFilters => "disable_queued_filters",
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Property {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Property::parse(s).ok_or_else(|| ModelError::UnknownProperty {
            name: s.to_string(),
        })
    }
}

/// Ordered, append-only list of property identifiers.
///
/// Appending does not deduplicate; the same property may be tagged twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyList(Vec<Property>);

impl PropertyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend<I>(&mut self, properties: I)
    where
        I: IntoIterator<Item = Property>,
    {
        self.0.extend(properties);
    }

    pub fn push(&mut self, property: Property) {
        self.0.push(property);
    }

    pub fn contains(&self, property: Property) -> bool {
        self.0.contains(&property)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Property> + '_ {
        self.0.iter().copied()
    }

    /// Properties in first-seen order with duplicates removed.
    pub fn unique(&self) -> Vec<Property> {
        let mut seen = Vec::with_capacity(self.0.len());
        for property in &self.0 {
            if !seen.contains(property) {
                seen.push(*property);
            }
        }
        seen
    }

    /// Wire names, as serialized for the browser.
    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(|property| property.as_str()).collect()
    }
}

impl FromIterator<Property> for PropertyList {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Property; N]> for PropertyList {
    fn from(properties: [Property; N]) -> Self {
        Self(properties.to_vec())
    }
}
