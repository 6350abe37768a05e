use std::path::Path;

use serde::Deserialize;

use crate::error::AlignmentError;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SrtGenConfig {
    pub aligner: AlignerConfig,
    pub timing: TimingConfig,
}

/// Scores for the global aligner and the size above which `Auto` falls back
/// to matching blocks.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlignerConfig {
    pub match_score: i32,
    /// Cost of the first token of a gap.
    pub gap_open: i32,
    /// Cost of every further token of the same gap.
    pub gap_extend: i32,
    pub max_global_cells: usize,
}

impl AlignerConfig {
    pub const DEFAULT_MATCH_SCORE: i32 = 2;
    pub const DEFAULT_GAP_OPEN: i32 = -2;
    pub const DEFAULT_GAP_EXTEND: i32 = -1;
    pub const DEFAULT_MAX_GLOBAL_CELLS: usize = 64_000_000;
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            match_score: Self::DEFAULT_MATCH_SCORE,
            gap_open: Self::DEFAULT_GAP_OPEN,
            gap_extend: Self::DEFAULT_GAP_EXTEND,
            max_global_cells: Self::DEFAULT_MAX_GLOBAL_CELLS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Recognizer position units per second.
    pub frame_rate: f64,
    /// Seconds added to every converted position.
    pub delay: f64,
    pub placeholder: String,
}

impl TimingConfig {
    pub const DEFAULT_FRAME_RATE: f64 = 100.0;
    pub const DEFAULT_PLACEHOLDER: &'static str = "???";
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frame_rate: Self::DEFAULT_FRAME_RATE,
            delay: 0.0,
            placeholder: Self::DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl SrtGenConfig {
    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        let data =
            std::fs::read_to_string(path).map_err(|e| AlignmentError::io("read config", e))?;
        let config: Self =
            serde_json::from_str(&data).map_err(|e| AlignmentError::json("parse config", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AlignmentError> {
        if !self.timing.frame_rate.is_finite() || self.timing.frame_rate <= 0.0 {
            return Err(AlignmentError::invalid_input(format!(
                "frame_rate must be a positive number, got {}",
                self.timing.frame_rate
            )));
        }
        if !self.timing.delay.is_finite() {
            return Err(AlignmentError::invalid_input("delay must be finite"));
        }
        if self.aligner.match_score <= 0 {
            return Err(AlignmentError::invalid_input(
                "match_score must be positive",
            ));
        }
        if self.aligner.gap_open > 0 || self.aligner.gap_extend > 0 {
            return Err(AlignmentError::invalid_input(
                "gap_open and gap_extend must not be positive",
            ));
        }
        Ok(())
    }
}
