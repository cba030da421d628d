//! Display and request configuration for report views.
//!
//! A controller builds a [`VisualizationDisplayConfig`] and a
//! [`VisualizationRequestConfig`] per request, sets the controller, applies
//! query-string overrides, and hands the configs to rendering. The
//! [`pipeline`] module runs the view's filters over report rows.
//!
//! # Example
//!
//! ```ignore
//! use dataview_config::{DisplayProperties, Settings, VisualizationDisplayConfig};
//! use dataview_model::{DefaultTranslator, QueryParams, StaticMetadata};
//!
//! let query = QueryParams::parse("show_goals=1");
//! let mut view = VisualizationDisplayConfig::new(&Settings::default(), &DefaultTranslator::new());
//! view.set_controller("Referrers", "getKeywords", &StaticMetadata::new());
//! view.apply_query_params(&query);
//! let browser_props = view.client_side_snapshot();
//! ```

pub mod display;
pub mod error;
pub mod pipeline;
pub mod properties;
pub mod request;
pub mod settings;
pub mod url;
pub mod visualization;

pub use display::{BaseDisplayConfig, FooterIcon, FooterIconGroup};
pub use error::SettingsError;
pub use pipeline::{FilterRegistry, FilterRunSummary, run_filters};
pub use properties::DisplayProperties;
pub use request::{RequestConfig, VisualizationRequestConfig};
pub use settings::{GeneralSettings, LoginSettings, Settings, load_settings};
pub use url::{GENERIC_FILTER_PARAMETERS, report_url};
pub use visualization::{RelatedReport, VisualizationDisplayConfig, split_report_id};
