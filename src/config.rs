//! Transformer configuration.
//!
//! All fields have defaults, so an empty JSON object is a valid config. Bad
//! entries are logged and dropped rather than rejected: an unknown resizer
//! name or a non-finite snap angle should not take the whole editor down.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Deserializer, Serialize};

use crate::anchor::ResizeAnchor;
use crate::consts::DEFAULT_ROTATE_HANDLER_OFFSET;
use crate::error::TransformerError;

/// Which handles are shown and how rotation behaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformerConfig {
    /// Resize anchors that may be shown. Unknown names are ignored.
    #[serde(deserialize_with = "deserialize_resizers")]
    pub enabled_resizers: Vec<ResizeAnchor>,
    /// Master switch for all resize anchors.
    pub resize_enabled: bool,
    /// Whether the rotate handle is available.
    pub rotate_enabled: bool,
    /// Angles in degrees that rotation snaps to.
    pub rotation_snaps: Vec<f64>,
    /// Distance in pixels from the top edge to the rotate handle.
    pub rotate_handler_offset: f64,
    /// Whether the connecting outline is drawn.
    pub line_enabled: bool,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            enabled_resizers: ResizeAnchor::ALL.to_vec(),
            resize_enabled: true,
            rotate_enabled: true,
            rotation_snaps: Vec::new(),
            rotate_handler_offset: DEFAULT_ROTATE_HANDLER_OFFSET,
            line_enabled: true,
        }
    }
}

impl TransformerConfig {
    /// Parse a config from JSON, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the input is not valid JSON for this shape.
    pub fn from_json(json: &str) -> Result<Self, TransformerError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Whether `anchor` is listed in `enabled_resizers`.
    #[must_use]
    pub fn is_resizer_enabled(&self, anchor: ResizeAnchor) -> bool {
        self.enabled_resizers.contains(&anchor)
    }

    /// Drop duplicate resizers and non-finite numbers.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let mut seen = Vec::with_capacity(self.enabled_resizers.len());
        for anchor in self.enabled_resizers {
            if !seen.contains(&anchor) {
                seen.push(anchor);
            }
        }
        self.enabled_resizers = seen;

        self.rotation_snaps = sanitize_snaps(self.rotation_snaps);

        if !self.rotate_handler_offset.is_finite() {
            tracing::warn!(
                offset = self.rotate_handler_offset,
                "non-finite rotate_handler_offset; using default"
            );
            self.rotate_handler_offset = DEFAULT_ROTATE_HANDLER_OFFSET;
        }
        self
    }
}

/// Parse resizer names, warning about and skipping unknown ones.
pub fn parse_resizers<I, S>(names: I) -> Vec<ResizeAnchor>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut anchors = Vec::new();
    for name in names {
        let name = name.as_ref();
        match name.parse::<ResizeAnchor>() {
            Ok(anchor) => {
                if !anchors.contains(&anchor) {
                    anchors.push(anchor);
                }
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    available = %ResizeAnchor::names().join(", "),
                    "ignoring unknown resizer name"
                );
            }
        }
    }
    anchors
}

/// Drop non-finite snap angles.
pub fn sanitize_snaps(snaps: Vec<f64>) -> Vec<f64> {
    snaps
        .into_iter()
        .filter(|deg| {
            if deg.is_finite() {
                true
            } else {
                tracing::warn!(snap = deg, "ignoring non-finite rotation snap");
                false
            }
        })
        .collect()
}

fn deserialize_resizers<'de, D>(deserializer: D) -> Result<Vec<ResizeAnchor>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = Vec::<String>::deserialize(deserializer)?;
    Ok(parse_resizers(names))
}
