use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("malformed report id '{report_id}': expected <module>.<action>")]
    MalformedReportId { report_id: String },

    #[error("unknown display property: {name}")]
    UnknownProperty { name: String },

    #[error("invalid value '{value}' for property {property}: expected {expected}")]
    InvalidPropertyValue {
        property: String,
        value: String,
        expected: &'static str,
    },

    #[error("failed to parse report metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl ModelError {
    pub(crate) fn invalid_value(
        property: impl Into<String>,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::InvalidPropertyValue {
            property: property.into(),
            value: value.into(),
            expected,
        }
    }
}

/// Errors raised while running a filter over a [`crate::DataTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unknown filter: {name}")]
    UnknownFilter { name: String },

    #[error("invalid parameter for filter {filter}: {message}")]
    InvalidParameter { filter: String, message: String },

    #[error("filter {filter} failed: {message}")]
    Failed { filter: String, message: String },
}

impl FilterError {
    pub fn invalid_parameter(filter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            filter: filter.into(),
            message: message.into(),
        }
    }

    /// Error for callback filters that cannot finish.
    pub fn failed(filter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            filter: filter.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
