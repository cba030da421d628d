//! Shared types for report views.
//!
//! - [`Property`] / [`PropertyList`]: identifiers of configurable fields
//! - [`QueryParams`]: inbound request parameters
//! - [`DataTable`] / [`Row`]: report rows filters operate on
//! - [`Filter`]: post-processing steps, named or closures
//! - [`Translator`]: message lookup for headings and form errors
//! - [`MetadataProvider`]: report documentation source

pub mod error;
pub mod filter;
pub mod metadata;
pub mod property;
pub mod query;
pub mod sites;
pub mod table;
pub mod translation;

pub use error::{FilterError, ModelError, Result};
pub use filter::{Filter, FilterCallback, FilterFn, FilterKind, partition_filters};
pub use metadata::{MetadataProvider, ReportMetadata, StaticMetadata};
pub use property::{Property, PropertyList, PropertySnapshot};
pub use query::{QueryParams, loosely_equals_one, parse_bool, parse_int};
pub use sites::SiteSummaryRow;
pub use table::{DataTable, Row, SortOrder, value_as_f64, value_to_text};
pub use translation::{DefaultTranslator, Translator, default_metric_translations};
