//! Editor settings shared by the registry and the file layer.

use serde::{Deserialize, Serialize};

use crate::codec::PairPolicy;

/// Tunable editor behaviour. Missing JSON fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Base name for tables created from the context menu.
    pub default_table_name: String,
    /// Base name for new or imported samplers without a usable name.
    pub default_sampler_name: String,
    /// Rows written when a sampler is exported as an image.
    pub export_height: u32,
    /// How duplicated texel pairs are merged on signed-domain import.
    pub pair_policy: PairPolicy,
    /// File extension (without dot) of the native binary container.
    pub binary_extension: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_table_name: "LUT_Table".to_string(),
            default_sampler_name: "NewSampler".to_string(),
            export_height: 128,
            pair_policy: PairPolicy::SecondCopy,
            binary_extension: "blut".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
