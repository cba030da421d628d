//! Integration tests for the report helpers behind the CLI commands.

use std::fs;

use chrono::{TimeDelta, TimeZone, Utc};
use dataview_cli::report::{
    FormKind, build_view, check_submission, load_metadata, load_render_input, nonce_store,
    property_rows, render,
};
use dataview_config::{DisplayProperties, FilterRegistry, LoginSettings, Settings};
use dataview_login::{FormData, NonceError};
use dataview_model::{DefaultTranslator, QueryParams, Row, StaticMetadata};
use tempfile::TempDir;

const KEYWORDS: &str = r#"{
  "rows": [
    {"label": "rust tutorial", "nb_visits": 50, "nb_actions": 120},
    {"label": "go channels", "nb_visits": 80, "nb_actions": 90},
    {"label": "rust book", "nb_visits": 20, "nb_actions": 30},
    {"label": "rust", "nb_visits": 2, "nb_actions": 2}
  ],
  "filters": [
    {"name": "ExcludeLowPopulation", "params": ["nb_visits", 5], "priority": true},
    {"name": "Pattern", "params": ["label", "^rust"]}
  ]
}"#;

#[test]
fn build_view_applies_overrides_and_self_url() {
    let query = QueryParams::parse(
        "module=Referrers&action=getKeywords&idSite=1&show_goals=1&filter_limit=5&show_footer=nope",
    );
    let view = build_view(
        "Referrers.getKeywords",
        &query,
        &Settings::default(),
        &DefaultTranslator::new(),
        &StaticMetadata::new(),
    )
    .unwrap();

    assert!(view.display.show_goals);
    assert!(view.display.show_footer);
    assert_eq!(view.request.filter_limit, Some(5));
    assert_eq!(
        view.display.self_url,
        "index.php?action=getKeywords&idSite=1&module=Referrers&show_footer=nope&show_goals=1"
    );
}

#[test]
fn build_view_rejects_malformed_report_ids() {
    let err = build_view(
        "Referrers",
        &QueryParams::new(),
        &Settings::default(),
        &DefaultTranslator::new(),
        &StaticMetadata::new(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("malformed report id"));
}

#[test]
fn metadata_file_feeds_documentation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("metadata.json");
    fs::write(
        &path,
        r#"{"Referrers.getKeywords": {"documentation": "Search keywords.", "metricsDocumentation": {"nb_visits": "Visits."}}}"#,
    )
    .unwrap();

    let metadata = load_metadata(Some(path.as_path())).unwrap();
    let view = build_view(
        "Referrers.getKeywords",
        &QueryParams::new(),
        &Settings::default(),
        &DefaultTranslator::new(),
        &metadata,
    )
    .unwrap();
    let rows = property_rows(&view.display.properties());
    let documentation = rows
        .iter()
        .find(|(name, _)| name == "documentation")
        .map(|(_, value)| value.as_str());
    assert_eq!(documentation, Some("Search keywords."));
}

#[test]
fn missing_metadata_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = load_metadata(Some(dir.path().join("absent.json").as_path())).unwrap_err();
    assert!(format!("{err:#}").contains("read metadata file"));
}

#[test]
fn render_runs_file_filters_then_generic_ones() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keywords.json");
    fs::write(&path, KEYWORDS).unwrap();

    let query = QueryParams::parse("filter_sort_column=nb_visits&filter_sort_order=asc");
    let input = load_render_input(&path).unwrap();
    let view = build_view(
        "Referrers.getKeywords",
        &query,
        &Settings::default(),
        &DefaultTranslator::new(),
        &StaticMetadata::new(),
    )
    .unwrap();
    let rendered = render(input, view, &query, &FilterRegistry::new()).unwrap();

    let labels: Vec<_> = rendered.table.rows().iter().filter_map(Row::label).collect();
    assert_eq!(labels, vec!["rust book", "rust tutorial"]);
    assert_eq!(rendered.summary.priority, 1);
    assert_eq!(rendered.summary.generic, 1);
    assert_eq!(rendered.summary.queued, 1);
    assert_eq!(
        rendered.columns,
        vec![
            ("label".to_string(), "Label".to_string()),
            ("nb_visits".to_string(), "Visits".to_string()),
        ]
    );
}

#[test]
fn render_honours_columns_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keywords.json");
    fs::write(&path, r#"{"rows": [{"label": "a", "nb_actions": 3}]}"#).unwrap();

    let query = QueryParams::new();
    let mut view = build_view(
        "Referrers.getKeywords",
        &query,
        &Settings::default(),
        &DefaultTranslator::new(),
        &StaticMetadata::new(),
    )
    .unwrap();
    view.display.columns_to_display = vec!["nb_actions".to_string()];
    let rendered = render(
        load_render_input(&path).unwrap(),
        view,
        &query,
        &FilterRegistry::new(),
    )
    .unwrap();
    assert_eq!(
        rendered.columns,
        vec![("nb_actions".to_string(), "Actions".to_string())]
    );
}

#[test]
fn set_new_password_form_reports_mismatch() {
    let form = FormKind::SetNewPassword.build(&DefaultTranslator::new());
    let data: FormData = [("form_password", "hunter2"), ("form_password_bis", "hunter3")]
        .into_iter()
        .collect();
    let report = form.validate(&data);
    insta::assert_json_snapshot!(report, @r#"
    {
      "form_id": "setnewpasswordform",
      "errors": [
        {
          "element": "form_password_bis",
          "message": "Passwords do not match."
        }
      ]
    }
    "#);
}

fn login_fields() -> Vec<(String, String)> {
    vec![
        ("form_login".to_string(), "admin".to_string()),
        ("form_password".to_string(), "hunter2".to_string()),
    ]
}

#[test]
fn nonce_lifetime_comes_from_login_settings() {
    let settings = LoginSettings {
        nonce_ttl_secs: 60,
        nonce_secret: "s3cret".to_string(),
    };
    let form = FormKind::Login.build(&DefaultTranslator::new());
    let rendered_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

    let mut nonces = nonce_store(&settings);
    assert_eq!(nonces.ttl(), TimeDelta::seconds(60));
    let check = check_submission(
        &form,
        &login_fields(),
        &mut nonces,
        rendered_at,
        rendered_at + TimeDelta::seconds(59),
    );
    assert!(check.is_valid());

    let check = check_submission(
        &form,
        &login_fields(),
        &mut nonces,
        rendered_at,
        rendered_at + TimeDelta::seconds(60),
    );
    assert!(check.validation.is_valid());
    assert_eq!(
        check.nonce,
        Err(NonceError::Expired {
            expired_at: rendered_at + TimeDelta::seconds(60)
        })
    );
    assert!(!check.is_valid());
}

#[test]
fn submitted_nonce_must_have_been_issued() {
    let form = FormKind::Login.build(&DefaultTranslator::new());
    let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let mut nonces = nonce_store(&Settings::default().login);
    assert_eq!(nonces.ttl(), TimeDelta::seconds(600));

    let mut fields = login_fields();
    fields.push(("form_nonce".to_string(), "forged".to_string()));
    let check = check_submission(&form, &fields, &mut nonces, now, now);
    assert_eq!(check.nonce, Err(NonceError::Unknown));
}
