use std::io;

use anyhow::{Context, Result};
use chrono::{TimeDelta, Utc};
use tracing::info_span;

use dataview_cli::report::{
    build_view, check_submission, load_metadata, load_render_input, nonce_store, property_rows,
    render,
};
use dataview_config::{DisplayProperties, FilterRegistry, Settings};
use dataview_model::{DefaultTranslator, QueryParams};

use crate::cli::{OutputFormatArg, PropertiesArgs, RenderArgs, ValidateFormArgs};
use crate::summary::{print_properties, print_rendered, print_validation};

pub fn run_properties(args: &PropertiesArgs, settings: &Settings) -> Result<()> {
    let span = info_span!("properties", report_id = %args.report_id);
    let _guard = span.enter();

    let query = QueryParams::parse(&args.query);
    let metadata = load_metadata(args.metadata.as_deref())?;
    let view = build_view(
        &args.report_id,
        &query,
        settings,
        &DefaultTranslator::new(),
        &metadata,
    )?;

    let snapshot = if args.client_side {
        view.display.client_side_snapshot()
    } else {
        view.display.properties()
    };

    match args.format {
        OutputFormatArg::Table => {
            let client_side = view.display.client_side_properties.names();
            print_properties(&args.report_id, &property_rows(&snapshot), &client_side);
        }
        OutputFormatArg::Json => {
            let json = serde_json::to_string_pretty(&snapshot).context("serialize properties")?;
            println!("{json}");
        }
        OutputFormatArg::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            writer
                .write_record(["property", "value"])
                .context("write csv header")?;
            for (name, value) in property_rows(&snapshot) {
                writer
                    .write_record([name.as_str(), value.as_str()])
                    .context("write csv row")?;
            }
            writer.flush().context("flush csv output")?;
        }
    }
    Ok(())
}

pub fn run_render(args: &RenderArgs, settings: &Settings) -> Result<()> {
    let span = info_span!("render", report_id = %args.report_id);
    let _guard = span.enter();

    let query = QueryParams::parse(&args.query);
    let input = load_render_input(&args.data_file)?;
    let view = build_view(
        &args.report_id,
        &query,
        settings,
        &DefaultTranslator::new(),
        &load_metadata(None)?,
    )?;
    let rendered = render(input, view, &query, &FilterRegistry::new())?;
    print_rendered(&args.report_id, &rendered);
    Ok(())
}

/// Returns whether the submission is valid.
pub fn run_validate_form(args: &ValidateFormArgs, settings: &Settings) -> Result<bool> {
    let form = args.form.build(&DefaultTranslator::new());
    let mut nonces = nonce_store(&settings.login);
    let rendered_at = Utc::now();
    let submitted_at = TimeDelta::try_seconds(args.submit_after)
        .and_then(|delay| rendered_at.checked_add_signed(delay))
        .with_context(|| format!("submit delay out of range: {}s", args.submit_after))?;
    let check = check_submission(&form, &args.fields, &mut nonces, rendered_at, submitted_at);
    print_validation(&check);
    Ok(check.is_valid())
}
