//! Message lookup for column headings and validation messages.

use std::collections::BTreeMap;

/// Resolves translation keys such as `General_ColumnNbVisits`.
pub trait Translator {
    /// Text for `key`, or `None` if the key is unknown.
    fn lookup(&self, key: &str) -> Option<&str>;

    /// Text for `key`; unknown keys translate to themselves.
    fn translate(&self, key: &str) -> String {
        self.lookup(key).unwrap_or(key).to_string()
    }

    /// Text for `key` with each `%s` replaced by the next argument.
    fn translate_with(&self, key: &str, args: &[&str]) -> String {
        let template = self.translate(key);
        let mut out = String::with_capacity(template.len());
        let mut args = args.iter();
        let mut rest = template.as_str();
        while let Some(pos) = rest.find("%s") {
            out.push_str(&rest[..pos]);
            match args.next() {
                Some(arg) => out.push_str(arg),
                None => out.push_str("%s"),
            }
            rest = &rest[pos + 2..];
        }
        out.push_str(rest);
        out
    }
}

const ENGLISH: &[(&str, &str)] = &[
    ("General_ColumnLabel", "Label"),
    ("General_Date", "Date"),
    ("General_ColumnNbVisits", "Visits"),
    ("General_ColumnNbUniqVisitors", "Unique visitors"),
    ("General_ColumnNbActions", "Actions"),
    ("General_ColumnMaxActions", "Maximum actions in one visit"),
    ("General_ColumnSumVisitLength", "Total time spent by visitors (in seconds)"),
    ("General_ColumnBounces", "Bounces"),
    ("General_ColumnVisitsWithConversions", "Visits with Conversions"),
    ("General_ColumnNbUsers", "Users"),
    ("General_ColumnConversionRate", "Conversion Rate"),
    ("General_ColumnActionsPerVisit", "Actions per Visit"),
    ("General_ColumnAvgTimeOnSite", "Avg. Time on Website"),
    ("General_ColumnBounceRate", "Bounce Rate"),
    ("General_Required", "%s required"),
    ("General_Username", "Username"),
    ("General_Password", "Password"),
    ("Login_PasswordRepeat", "Password (repeat)"),
    ("Login_PasswordsDoNotMatch", "Passwords do not match."),
    ("Login_LostYourPassword", "Lost your password?"),
    ("Login_InvalidOrExpiredToken", "Token is invalid or has expired."),
];

/// Built-in English messages, optionally extended with custom entries.
#[derive(Debug, Clone)]
pub struct DefaultTranslator {
    messages: BTreeMap<String, String>,
}

impl Default for DefaultTranslator {
    fn default() -> Self {
        Self {
            messages: ENGLISH
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }
}

impl DefaultTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_message(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.messages.insert(key.into(), text.into());
        self
    }
}

impl Translator for DefaultTranslator {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }
}

/// Columns every report may carry, with their translation keys.
pub const DEFAULT_METRICS: &[(&str, &str)] = &[
    ("label", "General_ColumnLabel"),
    ("date", "General_Date"),
    ("nb_visits", "General_ColumnNbVisits"),
    ("nb_uniq_visitors", "General_ColumnNbUniqVisitors"),
    ("nb_actions", "General_ColumnNbActions"),
    ("max_actions", "General_ColumnMaxActions"),
    ("sum_visit_length", "General_ColumnSumVisitLength"),
    ("bounce_count", "General_ColumnBounces"),
    ("nb_visits_converted", "General_ColumnVisitsWithConversions"),
    ("nb_users", "General_ColumnNbUsers"),
];

/// Metrics computed from the default ones.
pub const DEFAULT_PROCESSED_METRICS: &[(&str, &str)] = &[
    ("conversion_rate", "General_ColumnConversionRate"),
    ("nb_actions_per_visit", "General_ColumnActionsPerVisit"),
    ("avg_time_on_site", "General_ColumnAvgTimeOnSite"),
    ("bounce_rate", "General_ColumnBounceRate"),
];

/// Column heading translations for default and processed metrics.
pub fn default_metric_translations(translator: &dyn Translator) -> BTreeMap<String, String> {
    DEFAULT_METRICS
        .iter()
        .chain(DEFAULT_PROCESSED_METRICS)
        .map(|(column, key)| ((*column).to_string(), translator.translate(key)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_placeholders_in_order() {
        let t = DefaultTranslator::new();
        assert_eq!(
            t.translate_with("General_Required", &["Username"]),
            "Username required"
        );
    }

    #[test]
    fn unknown_keys_translate_to_themselves() {
        let t = DefaultTranslator::new();
        assert_eq!(t.translate("Nope_Missing"), "Nope_Missing");
    }

    #[test]
    fn metric_translations_cover_processed_metrics() {
        let translations = default_metric_translations(&DefaultTranslator::new());
        assert_eq!(translations["nb_visits"], "Visits");
        assert_eq!(translations["bounce_rate"], "Bounce Rate");
    }
}
