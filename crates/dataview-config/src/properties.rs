//! Shared behavior of configs: query-string overrides and snapshots.

use dataview_model::{ModelError, Property, PropertyList, PropertySnapshot, QueryParams};
use tracing::{debug, warn};

/// A config whose fields are addressable by [`Property`].
pub trait DisplayProperties {
    /// Properties that may be set from query parameters.
    fn overridable_properties(&self) -> &PropertyList;

    /// Properties exposed to browser-side code.
    fn client_side_properties(&self) -> &PropertyList;

    /// Assign a raw query value to `property`.
    ///
    /// Returns `Ok(false)` when this config has no scalar field for the
    /// property, so the override is skipped.
    fn set_property(&mut self, property: Property, raw: &str) -> Result<bool, ModelError>;

    /// Every field of the config by name.
    fn properties(&self) -> PropertySnapshot;

    /// Apply overrides for each overridable property present in `params`.
    ///
    /// Unknown parameters are ignored. Values that fail to parse are logged
    /// and leave the field unchanged. Returns the number of fields set.
    fn apply_query_params(&mut self, params: &QueryParams) -> usize {
        let mut applied = 0;
        for property in self.overridable_properties().unique() {
            let Some(raw) = params.get(property.as_str()) else {
                continue;
            };
            match self.set_property(property, raw) {
                Ok(true) => {
                    debug!(property = %property, value = raw, "applied query override");
                    applied += 1;
                }
                Ok(false) => {
                    debug!(property = %property, "property not carried by this config");
                }
                Err(error) => {
                    warn!(property = %property, %error, "ignoring query override");
                }
            }
        }
        applied
    }

    /// Snapshot restricted to client-side properties, for serialization to
    /// the browser.
    fn client_side_snapshot(&self) -> PropertySnapshot {
        let all = self.properties();
        self.client_side_properties()
            .unique()
            .into_iter()
            .filter_map(|property| {
                all.get(property.as_str())
                    .map(|value| (property.as_str().to_string(), value.clone()))
            })
            .collect()
    }
}

pub(crate) fn put(
    snapshot: &mut PropertySnapshot,
    property: Property,
    value: impl Into<serde_json::Value>,
) {
    snapshot.insert(property.as_str().to_string(), value.into());
}

/// Non-empty trimmed text, or `None`.
pub(crate) fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
