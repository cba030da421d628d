//! Command logic that does not print: building view configs, loading
//! render input, and picking forms.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use clap::ValueEnum;
use dataview_config::{
    DisplayProperties, FilterRegistry, FilterRunSummary, LoginSettings, Settings,
    VisualizationDisplayConfig, VisualizationRequestConfig, report_url, run_filters,
    split_report_id,
};
use dataview_login::{
    Form, FormData, NonceError, NonceStore, ValidationReport, login_form, reset_password_form,
    set_new_password_form,
};
use dataview_model::{
    DataTable, Filter, MetadataProvider, PropertySnapshot, QueryParams, StaticMetadata,
    Translator, value_to_text,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

/// Display and request config of one report view.
#[derive(Debug, Clone)]
pub struct ReportView {
    pub display: VisualizationDisplayConfig,
    pub request: VisualizationRequestConfig,
}

/// Build the configs a controller would hand to rendering for `report_id`
/// under `query`.
pub fn build_view(
    report_id: &str,
    query: &QueryParams,
    settings: &Settings,
    translator: &dyn Translator,
    metadata: &dyn MetadataProvider,
) -> Result<ReportView> {
    let (module, action) = split_report_id(report_id)?;

    let mut display = VisualizationDisplayConfig::new(settings, translator);
    display.set_controller(module, action, metadata);
    display.self_url = report_url(module, action, &QueryParams::new(), query);
    let applied = display.apply_query_params(query);

    let mut request = VisualizationRequestConfig::new();
    let applied_request = request.apply_query_params(query);
    debug!(
        report_id,
        display_overrides = applied,
        request_overrides = applied_request,
        "built report view"
    );

    Ok(ReportView { display, request })
}

pub fn load_metadata(path: Option<&Path>) -> Result<StaticMetadata> {
    let Some(path) = path else {
        return Ok(StaticMetadata::new());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("read metadata file {}", path.display()))?;
    let metadata = StaticMetadata::from_json(&content)
        .with_context(|| format!("parse metadata file {}", path.display()))?;
    info!(path = %path.display(), reports = metadata.len(), "loaded report metadata");
    Ok(metadata)
}

/// Property name and rendered value pairs, in name order.
pub fn property_rows(snapshot: &PropertySnapshot) -> Vec<(String, String)> {
    snapshot
        .iter()
        .map(|(name, value)| (name.clone(), render_value(value)))
        .collect()
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
        other => value_to_text(other),
    }
}

/// A filter declared in render input.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterSpec {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Value>,
    #[serde(default)]
    pub priority: bool,
}

/// Content of a `render` data file.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderInput {
    pub rows: DataTable,
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
}

pub fn load_render_input(path: &Path) -> Result<RenderInput> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read data file {}", path.display()))?;
    let input: RenderInput = serde_json::from_str(&content)
        .with_context(|| format!("parse data file {}", path.display()))?;
    info!(
        path = %path.display(),
        rows = input.rows.len(),
        filters = input.filters.len(),
        "loaded render input"
    );
    Ok(input)
}

/// Filtered rows with the columns to show and their headings.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub table: DataTable,
    /// (column, heading) pairs in display order.
    pub columns: Vec<(String, String)>,
    pub summary: FilterRunSummary,
}

/// Run the view's filters over the input rows and pick display columns.
pub fn render(
    input: RenderInput,
    mut view: ReportView,
    query: &QueryParams,
    registry: &FilterRegistry,
) -> Result<RenderedReport> {
    for spec in input.filters {
        view.display
            .add_filter(Filter::named(spec.name, spec.params).with_priority(spec.priority));
    }

    let mut table = input.rows;
    let summary = run_filters(&mut table, &view.display, &view.request, query, registry)
        .with_context(|| format!("run filters for {}", view.display.report_id))?;

    if view.display.columns_to_display.is_empty() {
        view.display.set_default_columns_to_display(
            table.column_names(),
            table.has_column("nb_visits"),
            table.has_column("nb_uniq_visitors"),
        );
    }
    let columns = view
        .display
        .columns_to_display
        .iter()
        .map(|column| {
            let heading = view
                .display
                .translations
                .get(column)
                .cloned()
                .unwrap_or_else(|| column.clone());
            (column.clone(), heading)
        })
        .collect();

    Ok(RenderedReport {
        table,
        columns,
        summary,
    })
}

/// Login forms the CLI can validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormKind {
    Login,
    ResetPassword,
    SetNewPassword,
}

impl FormKind {
    pub fn build(self, translator: &dyn Translator) -> Form {
        match self {
            Self::Login => login_form(translator),
            Self::ResetPassword => reset_password_form(translator),
            Self::SetNewPassword => set_new_password_form(translator),
        }
    }
}

/// Nonce store using the configured secret and lifetime.
pub fn nonce_store(settings: &LoginSettings) -> NonceStore {
    let ttl = TimeDelta::try_seconds(settings.nonce_ttl_secs).unwrap_or_else(TimeDelta::zero);
    NonceStore::new(settings.nonce_secret.as_str()).with_ttl(ttl)
}

/// Result of submitting a form that was rendered at some earlier time.
#[derive(Debug, Clone)]
pub struct SubmissionCheck {
    pub validation: ValidationReport,
    pub nonce: Result<(), NonceError>,
}

impl SubmissionCheck {
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid() && self.nonce.is_ok()
    }
}

/// Render `form` with a fresh nonce at `rendered_at`, then submit `fields`
/// at `submitted_at`.
///
/// The issued nonce fills `form_nonce` unless the submission carries its own.
pub fn check_submission(
    form: &Form,
    fields: &[(String, String)],
    nonces: &mut NonceStore,
    rendered_at: DateTime<Utc>,
    submitted_at: DateTime<Utc>,
) -> SubmissionCheck {
    let ttl = nonces.ttl();
    let issued = nonces.issue(&form.id, rendered_at, ttl);
    let mut data: FormData = fields.iter().cloned().collect();
    if !data.contains("form_nonce") {
        data.insert("form_nonce", issued);
    }
    let nonce = match data.get("form_nonce") {
        Some(token) => nonces.verify(&form.id, token, submitted_at),
        None => Err(NonceError::Unknown),
    };
    SubmissionCheck {
        validation: form.validate(&data),
        nonce,
    }
}

/// Parse a `name=value` field argument.
pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    if name.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok((name.to_string(), value.to_string()))
}
