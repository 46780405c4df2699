//! Editor configuration.
//!
//! All geometric values are in world units. The bidirectional offset is read
//! by both the hit tester and the renderer so the two always agree.

use crate::error::{EditError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How business identifiers (`bankId` / `name`) are compared for uniqueness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NameScope {
    /// Identifiers are unique within a node type
    #[default]
    PerType,
    /// Identifiers are unique across every node in the graph
    Global,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub node_radius: f32,
    pub edge_hit_threshold: f32,
    pub bidirectional_offset: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_step: f32,
    pub message_duration_ms: u64,
    pub name_scope: NameScope,
    /// Reverse bank derived properties when a single edge is deleted.
    pub reconcile_on_edge_delete: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            node_radius: 30.0,
            edge_hit_threshold: 12.0,
            bidirectional_offset: 5.0,
            min_zoom: 0.1,
            max_zoom: 5.0,
            zoom_step: 1.1,
            message_duration_ms: 3000,
            name_scope: NameScope::PerType,
            reconcile_on_edge_delete: false,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| EditError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.node_radius > 0.0) {
            return Err(EditError::InvalidConfig(format!(
                "nodeRadius must be positive, got {}",
                self.node_radius
            )));
        }
        if !(self.edge_hit_threshold > 0.0) {
            return Err(EditError::InvalidConfig(format!(
                "edgeHitThreshold must be positive, got {}",
                self.edge_hit_threshold
            )));
        }
        if !(self.min_zoom > 0.0 && self.min_zoom < self.max_zoom) {
            return Err(EditError::InvalidConfig(format!(
                "zoom range {}..{} is empty",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.zoom_step > 1.0) {
            return Err(EditError::InvalidConfig(format!(
                "zoomStep must be greater than 1, got {}",
                self.zoom_step
            )));
        }
        Ok(())
    }

    pub fn message_duration(&self) -> Duration {
        Duration::from_millis(self.message_duration_ms)
    }
}
