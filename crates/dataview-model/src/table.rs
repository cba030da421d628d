//! In-memory report rows that filters operate on.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sort direction for report columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// One report row: column name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    pub columns: BTreeMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.columns.insert(column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    pub fn label(&self) -> Option<&str> {
        self.columns.get("label").and_then(Value::as_str)
    }

    /// Column value rendered as text (strings unquoted).
    pub fn text(&self, column: &str) -> Option<String> {
        self.columns.get(column).map(value_to_text)
    }
}

/// Report result set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataTable {
    rows: Vec<Row>,
}

impl DataTable {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Column names in first-seen order.
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for row in &self.rows {
            for name in row.columns.keys() {
                if !names.iter().any(|n| n == name) {
                    names.push(name.clone());
                }
            }
        }
        names
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.rows.iter().any(|row| row.columns.contains_key(column))
    }

    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&Row) -> bool,
    {
        self.rows.retain(keep);
    }

    /// Stable sort on a column. Rows missing the column sort last in either
    /// direction. Finite numbers come before text and compare numerically;
    /// text compares lexically.
    pub fn sort_by_column(&mut self, column: &str, order: SortOrder) {
        self.rows.sort_by(|a, b| {
            match (a.columns.get(column), b.columns.get(column)) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(left), Some(right)) => {
                    let ordering = compare_values(left, right);
                    match order {
                        SortOrder::Asc => ordering,
                        SortOrder::Desc => ordering.reverse(),
                    }
                }
            }
        });
    }

    /// Keep `limit` rows starting at `offset`. A negative limit keeps all
    /// rows after the offset.
    pub fn slice(&mut self, offset: usize, limit: i64) {
        let start = offset.min(self.rows.len());
        self.rows.drain(..start);
        if let Ok(limit) = usize::try_from(limit) {
            self.rows.truncate(limit);
        }
    }

    pub fn delete_columns(&mut self, columns: &[String]) {
        for row in &mut self.rows {
            for column in columns {
                row.columns.remove(column);
            }
        }
    }
}

impl FromIterator<Row> for DataTable {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Numeric view of a cell, accepting numeric strings.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn finite_number(value: &Value) -> Option<f64> {
    value_as_f64(value).filter(|n| n.is_finite())
}

fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (finite_number(left), finite_number(right)) {
        (Some(l), Some(r)) => l.total_cmp(&r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => value_to_text(left).cmp(&value_to_text(right)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DataTable {
        DataTable::new(vec![
            Row::new().with("label", "a").with("nb_visits", 5),
            Row::new().with("label", "b").with("nb_visits", 12),
            Row::new().with("label", "c"),
            Row::new().with("label", "d").with("nb_visits", "7"),
        ])
    }

    #[test]
    fn sorts_numerically_with_missing_last() {
        let mut t = table();
        t.sort_by_column("nb_visits", SortOrder::Desc);
        let labels: Vec<_> = t.rows().iter().filter_map(Row::label).collect();
        assert_eq!(labels, vec!["b", "d", "a", "c"]);

        t.sort_by_column("nb_visits", SortOrder::Asc);
        let labels: Vec<_> = t.rows().iter().filter_map(Row::label).collect();
        assert_eq!(labels, vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn mixed_numeric_and_text_labels_sort_numbers_first() {
        let labels = ["1x", "10", "2", "NaN", "abc", "-3", "2.5"];
        let mut t: DataTable = labels
            .iter()
            .map(|label| Row::new().with("label", *label))
            .collect();
        t.sort_by_column("label", SortOrder::Asc);
        let sorted: Vec<_> = t.rows().iter().filter_map(Row::label).collect();
        assert_eq!(sorted, vec!["-3", "2", "2.5", "10", "1x", "NaN", "abc"]);

        t.sort_by_column("label", SortOrder::Desc);
        let sorted: Vec<_> = t.rows().iter().filter_map(Row::label).collect();
        assert_eq!(sorted, vec!["abc", "NaN", "1x", "10", "2.5", "2", "-3"]);
    }

    #[test]
    fn slice_handles_offset_past_end_and_unlimited() {
        let mut t = table();
        t.slice(1, 2);
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows()[0].label(), Some("b"));

        let mut t = table();
        t.slice(2, -1);
        assert_eq!(t.len(), 2);

        let mut t = table();
        t.slice(10, 5);
        assert!(t.is_empty());
    }

    #[test]
    fn column_names_in_first_seen_order() {
        let t = table();
        assert_eq!(t.column_names(), vec!["label", "nb_visits"]);
        assert!(t.has_column("nb_visits"));
        assert!(!t.has_column("nb_uniq_visitors"));
    }
}
