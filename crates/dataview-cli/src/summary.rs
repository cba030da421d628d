use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use dataview_cli::report::{RenderedReport, SubmissionCheck};
use dataview_model::value_as_f64;

pub fn print_properties(report_id: &str, rows: &[(String, String)], client_side: &[&str]) {
    println!("Report: {report_id}");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Property"),
        header_cell("Value"),
        header_cell("Client-side"),
    ]);
    apply_table_style(&mut table);
    table.set_constraints(vec![
        ColumnConstraint::UpperBoundary(Width::Fixed(34)),
        ColumnConstraint::UpperBoundary(Width::Percentage(70)),
        ColumnConstraint::LowerBoundary(Width::Fixed(11)),
    ]);
    align_column(&mut table, 2, CellAlignment::Center);
    for (name, value) in rows {
        let exposed = client_side.contains(&name.as_str());
        table.add_row(vec![
            Cell::new(name),
            if value.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(value)
            },
            if exposed {
                Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                dim_cell("")
            },
        ]);
    }
    println!("{table}");
}

pub fn print_rendered(report_id: &str, rendered: &RenderedReport) {
    println!("Report: {report_id}");
    let mut table = Table::new();
    table.set_header(
        rendered
            .columns
            .iter()
            .map(|(_, heading)| header_cell(heading))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for (index, (column, _)) in rendered.columns.iter().enumerate() {
        let numeric = rendered
            .table
            .rows()
            .iter()
            .filter_map(|row| row.get(column))
            .all(|value| value_as_f64(value).is_some());
        if numeric && column != "label" {
            align_column(&mut table, index, CellAlignment::Right);
        }
    }
    for row in rendered.table.rows() {
        table.add_row(
            rendered
                .columns
                .iter()
                .map(|(column, _)| match row.text(column) {
                    Some(text) => Cell::new(text),
                    None => dim_cell("-"),
                })
                .collect::<Vec<_>>(),
        );
    }
    println!("{table}");
    let summary = rendered.summary;
    println!(
        "Rows: {}  Filters: {} priority, {} generic, {} queued",
        rendered.table.len(),
        summary.priority,
        summary.generic,
        summary.queued
    );
}

pub fn print_validation(check: &SubmissionCheck) {
    let report = &check.validation;
    if let Err(error) = &check.nonce {
        println!("Form {}: nonce rejected: {error}", report.form_id);
    }
    if report.is_valid() {
        println!("Form {}: fields valid", report.form_id);
        return;
    }
    println!("Form {}: {} error(s)", report.form_id, report.errors.len());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Message")]);
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
    for error in &report.errors {
        table.add_row(vec![
            Cell::new(&error.element),
            Cell::new(&error.message).fg(Color::Red),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
