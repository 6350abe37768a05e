use serde::Serialize;

use crate::config::TimingConfig;
use crate::error::AlignmentError;
use crate::types::SentenceTiming;

/// Linear mapping from recognizer positions to seconds:
/// `seconds = delay + position / frame_rate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Calibration {
    pub frame_rate: f64,
    pub delay: f64,
}

/// Real times, in seconds, of the first and the last sentence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchors {
    pub first_seconds: f64,
    pub last_seconds: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            frame_rate: TimingConfig::DEFAULT_FRAME_RATE,
            delay: 0.0,
        }
    }
}

impl From<&TimingConfig> for Calibration {
    fn from(config: &TimingConfig) -> Self {
        Self {
            frame_rate: config.frame_rate,
            delay: config.delay,
        }
    }
}

impl Calibration {
    pub fn seconds(&self, position: f64) -> f64 {
        self.delay + position / self.frame_rate
    }

    pub fn seconds_opt(&self, position: Option<f64>) -> Option<f64> {
        position.map(|p| self.seconds(p))
    }

    /// Exact two-point fit through the first and last sentence starts.
    pub fn from_anchors(
        first_pos: Option<f64>,
        last_pos: Option<f64>,
        anchors: Anchors,
    ) -> Result<Self, AlignmentError> {
        let (Some(first_pos), Some(last_pos)) = (first_pos, last_pos) else {
            return Err(AlignmentError::calibration(
                "an anchor sentence has no resolved start position",
            ));
        };
        let span_seconds = anchors.last_seconds - anchors.first_seconds;
        if span_seconds == 0.0 || !span_seconds.is_finite() {
            return Err(AlignmentError::calibration(format!(
                "anchors must be distinct finite times, got {} and {}",
                anchors.first_seconds, anchors.last_seconds
            )));
        }

        let frame_rate = (last_pos - first_pos) / span_seconds;
        if !frame_rate.is_finite() || frame_rate <= 0.0 {
            return Err(AlignmentError::calibration(format!(
                "derived frame rate {frame_rate} is not a positive number"
            )));
        }
        let delay = anchors.first_seconds - first_pos / frame_rate;

        tracing::debug!(frame_rate, delay, "calibration: fitted from anchors");
        Ok(Self { frame_rate, delay })
    }
}

/// Fits a calibration using the first and the last sentence of the script.
pub fn calibrate(timings: &[SentenceTiming], anchors: Anchors) -> Result<Calibration, AlignmentError> {
    let (Some(first), Some(last)) = (timings.first(), timings.last()) else {
        return Err(AlignmentError::calibration("no sentences to calibrate against"));
    };
    Calibration::from_anchors(first.start_pos, last.start_pos, anchors)
}
