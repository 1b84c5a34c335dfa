// src/preset.rs
//! Data-driven scatter presets + loader.

use bevy::asset::{io::Reader, AssetLoader, LoadContext};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ScatterError;
use crate::placement::PlacementConfig;

// ---------- Public plugin to register asset+loader ----------

pub struct PresetAssetPlugin;

impl Plugin for PresetAssetPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<ScatterPreset>()
            .register_asset_loader(ScatterPresetLoader);
    }
}

// ---------- Preset (data form) ----------

#[derive(Asset, TypePath, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatterPreset {
    /// Human-readable name, used in logs.
    pub name: String,

    /// Vertex color written for every instance.
    #[serde(default = "default_color")]
    pub color: Vec4,

    pub placement: PlacementConfig,
}

fn default_color() -> Vec4 {
    Vec4::ONE
}

impl ScatterPreset {
    /// Parse and validate RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, PresetLoadError> {
        Self::from_ron_bytes(text.as_bytes())
    }

    pub fn from_ron_bytes(bytes: &[u8]) -> Result<Self, PresetLoadError> {
        let preset: ScatterPreset =
            ron::de::from_bytes(bytes).map_err(|e| PresetLoadError::Ron(e.to_string()))?;
        preset.placement.validate_static()?;
        Ok(preset)
    }

    pub fn to_ron_string(&self) -> Result<String, PresetLoadError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| PresetLoadError::Ron(e.to_string()))
    }
}

// ---------- Asset loader for `.scatter.ron` ----------

#[derive(Default)]
pub struct ScatterPresetLoader;

impl AssetLoader for ScatterPresetLoader {
    type Asset = ScatterPreset;
    type Settings = ();
    type Error = PresetLoadError;

    fn extensions(&self) -> &[&str] {
        &["scatter.ron"]
    }

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let preset = ScatterPreset::from_ron_bytes(&bytes)?;
        info!(
            "Preset '{}' loaded: {} with {} instances",
            preset.name,
            preset.placement.kind_name(),
            preset.placement.instance_count()
        );
        Ok(preset)
    }
}

// ---------- Loader errors ----------

#[derive(thiserror::Error, Debug)]
pub enum PresetLoadError {
    #[error("I/O while reading preset: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(String),
    #[error("Invalid preset: {0}")]
    Invalid(#[from] ScatterError),
}
