//! Render configuration.
//!
//! All fields have defaults matching the stock chart look, so a caller can
//! supply a partial JSON object (for example only `assetBase`).

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

pub const DEFAULT_ASSET_BASE: &str = "https://pjsek.ai/images/song/chart";
pub const DEFAULT_TICKS_PER_BEAT: u32 = 480;
pub const DEFAULT_REFERENCE_BPM: f64 = 140.0;
pub const DEFAULT_REFERENCE_PIXELS_PER_BEAT: f64 = 80.0;
pub const DEFAULT_BEAT_WIDTH_RATIO: f64 = 1.2;
pub const DEFAULT_MEASURE_GROUP_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    /// Base URL the sprite hrefs are resolved against
    pub asset_base: String,
    /// Temporal resolution of note ticks
    pub ticks_per_beat: u32,
    /// Tempo that maps to `reference_pixels_per_beat`
    pub reference_bpm: f64,
    pub reference_pixels_per_beat: f64,
    /// Width of the 12-lane field relative to one beat's height
    pub beat_width_ratio: f64,
    /// Measures per row
    pub measure_group_size: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            asset_base: DEFAULT_ASSET_BASE.to_string(),
            ticks_per_beat: DEFAULT_TICKS_PER_BEAT,
            reference_bpm: DEFAULT_REFERENCE_BPM,
            reference_pixels_per_beat: DEFAULT_REFERENCE_PIXELS_PER_BEAT,
            beat_width_ratio: DEFAULT_BEAT_WIDTH_RATIO,
            measure_group_size: DEFAULT_MEASURE_GROUP_SIZE,
        }
    }
}

impl RenderConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Default config with a different sprite location.
    pub fn with_asset_base(asset_base: impl Into<String>) -> Self {
        Self {
            asset_base: asset_base.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        if self.ticks_per_beat == 0 {
            return Err(RenderError::Config("ticksPerBeat must be positive".into()));
        }
        if self.measure_group_size == 0 {
            return Err(RenderError::Config("measureGroupSize must be positive".into()));
        }
        if !is_positive(self.reference_bpm) || !is_positive(self.reference_pixels_per_beat) {
            return Err(RenderError::Config("reference scale must be positive".into()));
        }
        if !is_positive(self.beat_width_ratio) {
            return Err(RenderError::Config("beatWidthRatio must be positive".into()));
        }
        Ok(())
    }

    /// Join a sprite file name onto the asset base.
    pub(crate) fn asset(&self, file: &str) -> String {
        format!("{}/{}", self.asset_base.trim_end_matches('/'), file)
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
