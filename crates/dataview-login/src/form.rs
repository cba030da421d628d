//! Declarative forms with per-element validation rules.
//!
//! A [`Form`] is an ordered list of elements, each carrying an ordered list of
//! [`Rule`]s. [`Form::validate`] runs one synchronous pass over the submitted
//! values and reports at most one error per element: the first rule that
//! fails.

use dataview_model::QueryParams;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Submitted form values, keyed by element name.
pub type FormData = QueryParams;

/// Input type of a form element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Password,
    Hidden,
    Checkbox,
    Submit,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Password => "password",
            Self::Hidden => "hidden",
            Self::Checkbox => "checkbox",
            Self::Submit => "submit",
        }
    }
}

/// Validation rule attached to an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    /// Value must be present and not only whitespace.
    Required { message: String },
    /// Value must equal the submitted value of element `other`.
    EqualTo { other: String, message: String },
}

impl Rule {
    pub fn required(message: impl Into<String>) -> Self {
        Self::Required {
            message: message.into(),
        }
    }

    pub fn equal_to(other: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EqualTo {
            other: other.into(),
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Required { message } | Self::EqualTo { message, .. } => message,
        }
    }

    fn passes(&self, value: Option<&str>, data: &FormData) -> bool {
        match self {
            Self::Required { .. } => value.is_some_and(|v| !v.trim().is_empty()),
            Self::EqualTo { other, .. } => {
                value.unwrap_or_default() == data.get(other).unwrap_or_default()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    pub name: String,
    pub rules: Vec<Rule>,
}

impl Element {
    pub fn new(kind: ElementKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Append a rule. Rules are checked in the order they were added.
    pub fn add_rule(&mut self, rule: Rule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// First failing rule for this element, if any.
    fn first_failure(&self, data: &FormData) -> Option<&Rule> {
        let value = data.get(&self.name);
        self.rules.iter().find(|rule| !rule.passes(value, data))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub id: String,
    pub method: String,
    pub elements: Vec<Element>,
}

impl Form {
    /// Empty form submitted with `post`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            method: "post".to_string(),
            elements: Vec::new(),
        }
    }

    /// Add an element and return it so rules can be attached.
    pub fn add_element(&mut self, kind: ElementKind, name: impl Into<String>) -> &mut Element {
        self.elements.push(Element::new(kind, name));
        let last = self.elements.len() - 1;
        &mut self.elements[last]
    }

    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|element| element.name == name)
    }

    pub fn validate(&self, data: &FormData) -> ValidationReport {
        let errors: Vec<FieldError> = self
            .elements
            .iter()
            .filter_map(|element| {
                element.first_failure(data).map(|rule| FieldError {
                    element: element.name.clone(),
                    message: rule.message().to_string(),
                })
            })
            .collect();

        debug!(form = %self.id, errors = errors.len(), "validated form");
        ValidationReport {
            form_id: self.id.clone(),
            errors,
        }
    }
}

/// A failed rule on one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub element: String,
    pub message: String,
}

/// Result of validating a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub form_id: String,
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_for(&self, element: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.element == element)
            .map(|error| error.message.as_str())
    }
}
