//! Base display properties shared by every report view.
//!
//! Changing these fields changes how a report is displayed. Fields tagged
//! client-side are serialized for browser code; fields tagged overridable can
//! be set from the query string (see [`DisplayProperties::apply_query_params`]).

use std::collections::BTreeMap;

use dataview_model::{
    MetadataProvider, ModelError, Property, PropertyList, PropertySnapshot, Translator,
    default_metric_translations, parse_bool, parse_int,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::properties::{DisplayProperties, optional_text, put};
use crate::settings::Settings;

/// Properties every view may override from the query string.
pub const BASE_OVERRIDABLE_PROPERTIES: [Property; 4] = [
    Property::ShowFooter,
    Property::ShowFooterIcons,
    Property::ShowAllViewsIcons,
    Property::ExportLimit,
];

/// A button in a footer icon group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterIcon {
    pub id: String,
    pub title: String,
    pub icon: String,
}

/// A group of footer icons sharing a CSS class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterIconGroup {
    pub class: String,
    pub buttons: Vec<FooterIcon>,
}

#[derive(Debug, Clone)]
pub struct BaseDisplayConfig {
    pub client_side_properties: PropertyList,
    pub overridable_properties: PropertyList,
    /// Footer icon groups. `None` shows the default set of view icons.
    pub footer_icons: Option<Vec<FooterIconGroup>>,
    /// Column name to display heading.
    pub translations: BTreeMap<String, String>,
    pub show_footer: bool,
    pub show_footer_icons: bool,
    /// Columns to show. Empty means "decide once data is loaded".
    pub columns_to_display: Vec<String>,
    pub show_all_views_icons: bool,
    pub documentation: Option<String>,
    pub metrics_documentation: BTreeMap<String, String>,
    /// URL of the report without generic filters.
    pub self_url: String,
    pub subtable_controller_action: String,
    /// `filter_limit` used in export links.
    pub export_limit: i64,
    pub report_id: String,
    pub controller_name: Option<String>,
    pub controller_action: Option<String>,
}

impl BaseDisplayConfig {
    pub fn new(settings: &Settings, translator: &dyn Translator) -> Self {
        Self {
            client_side_properties: PropertyList::new(),
            overridable_properties: PropertyList::from(BASE_OVERRIDABLE_PROPERTIES),
            footer_icons: None,
            translations: default_metric_translations(translator),
            show_footer: true,
            show_footer_icons: true,
            columns_to_display: Vec::new(),
            show_all_views_icons: true,
            documentation: None,
            metrics_documentation: BTreeMap::new(),
            self_url: String::new(),
            subtable_controller_action: String::new(),
            export_limit: settings.general.api_datatable_default_limit,
            report_id: String::new(),
            controller_name: None,
            controller_action: None,
        }
    }

    /// Set the controller serving the report and load its documentation.
    pub fn set_controller(
        &mut self,
        module: &str,
        action: &str,
        metadata: &dyn MetadataProvider,
    ) {
        self.controller_name = Some(module.to_string());
        self.controller_action = Some(action.to_string());
        self.report_id = format!("{module}.{action}");
        self.load_documentation(metadata);
    }

    fn load_documentation(&mut self, metadata: &dyn MetadataProvider) {
        self.metrics_documentation.clear();

        let (Some(module), Some(action)) = (&self.controller_name, &self.controller_action) else {
            return;
        };
        let Some(report) = metadata.report_metadata(module, action) else {
            debug!(report_id = %self.report_id, "no report metadata found");
            return;
        };
        if let Some(metrics) = report.metrics_documentation {
            self.metrics_documentation = metrics;
        }
        if let Some(documentation) = report.documentation {
            self.documentation = Some(documentation);
        }
    }

    pub fn add_properties_that_should_be_available_client_side<I>(&mut self, properties: I)
    where
        I: IntoIterator<Item = Property>,
    {
        self.client_side_properties.extend(properties);
    }

    pub fn add_properties_that_can_be_overwritten_by_query_params<I>(&mut self, properties: I)
    where
        I: IntoIterator<Item = Property>,
    {
        self.overridable_properties.extend(properties);
    }

    /// Pick the default columns once it is known which visit metrics exist.
    ///
    /// With visit data the result is `label` plus `nb_uniq_visitors` (when
    /// unique visitor data exists) or `nb_visits`. Otherwise `columns` is used
    /// with empty and `"0"` entries dropped.
    pub fn set_default_columns_to_display<I, S>(
        &mut self,
        columns: I,
        has_nb_visits: bool,
        has_nb_uniq_visitors: bool,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns_to_display = if has_nb_visits || has_nb_uniq_visitors {
            let metric = if has_nb_uniq_visitors {
                "nb_uniq_visitors"
            } else {
                "nb_visits"
            };
            vec!["label".to_string(), metric.to_string()]
        } else {
            columns
                .into_iter()
                .map(Into::into)
                .filter(|column| !column.is_empty() && column != "0")
                .collect()
        };
    }

    /// Set the heading of a column, replacing any existing one.
    pub fn add_translation(&mut self, column: impl Into<String>, translation: impl Into<String>) {
        self.translations.insert(column.into(), translation.into());
    }

    pub fn add_translations<I, K, V>(&mut self, translations: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (column, translation) in translations {
            self.add_translation(column, translation);
        }
    }

    /// Whether this is the report served by `module`/`action`.
    pub fn is_controller(&self, module: &str, action: &str) -> bool {
        self.controller_name.as_deref() == Some(module)
            && self.controller_action.as_deref() == Some(action)
    }
}

impl DisplayProperties for BaseDisplayConfig {
    fn overridable_properties(&self) -> &PropertyList {
        &self.overridable_properties
    }

    fn client_side_properties(&self) -> &PropertyList {
        &self.client_side_properties
    }

    fn set_property(&mut self, property: Property, raw: &str) -> Result<bool, ModelError> {
        let name = property.as_str();
        match property {
            Property::ShowFooter => self.show_footer = parse_bool(name, raw)?,
            Property::ShowFooterIcons => self.show_footer_icons = parse_bool(name, raw)?,
            Property::ShowAllViewsIcons => self.show_all_views_icons = parse_bool(name, raw)?,
            Property::ExportLimit => self.export_limit = parse_int(name, raw)?,
            Property::ColumnsToDisplay => {
                self.columns_to_display = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|column| !column.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            Property::Documentation => self.documentation = optional_text(raw),
            Property::SelfUrl => self.self_url = raw.to_string(),
            Property::SubtableControllerAction => {
                self.subtable_controller_action = raw.to_string();
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn properties(&self) -> PropertySnapshot {
        let mut snapshot = PropertySnapshot::new();
        snapshot.insert(
            "client_side_properties".to_string(),
            json!(self.client_side_properties.names()),
        );
        snapshot.insert(
            "overridable_properties".to_string(),
            json!(self.overridable_properties.names()),
        );
        put(&mut snapshot, Property::FooterIcons, json!(self.footer_icons));
        put(&mut snapshot, Property::Translations, json!(self.translations));
        put(&mut snapshot, Property::ShowFooter, self.show_footer);
        put(&mut snapshot, Property::ShowFooterIcons, self.show_footer_icons);
        put(&mut snapshot, Property::ColumnsToDisplay, json!(self.columns_to_display));
        put(&mut snapshot, Property::ShowAllViewsIcons, self.show_all_views_icons);
        put(&mut snapshot, Property::Documentation, json!(self.documentation));
        put(
            &mut snapshot,
            Property::MetricsDocumentation,
            json!(self.metrics_documentation),
        );
        put(&mut snapshot, Property::SelfUrl, self.self_url.as_str());
        put(
            &mut snapshot,
            Property::SubtableControllerAction,
            self.subtable_controller_action.as_str(),
        );
        put(&mut snapshot, Property::ExportLimit, self.export_limit);
        put(&mut snapshot, Property::ReportId, self.report_id.as_str());
        put(&mut snapshot, Property::ControllerName, json!(self.controller_name));
        put(&mut snapshot, Property::ControllerAction, json!(self.controller_action));
        snapshot
    }
}
