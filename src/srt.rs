use std::fmt::Write as _;

use serde::Serialize;

use crate::timing::{format_timestamp, Calibration};
use crate::types::SentenceTiming;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtitleCue {
    pub index: usize,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub text: String,
}

/// One cue per sentence, converted to seconds. Unresolved boundaries stay
/// `None`.
pub fn to_cues(timings: &[SentenceTiming], calibration: &Calibration) -> Vec<SubtitleCue> {
    timings
        .iter()
        .map(|timing| SubtitleCue {
            index: timing.index,
            start: calibration.seconds_opt(timing.start_pos),
            end: calibration.seconds_opt(timing.end_pos),
            text: timing.text.clone(),
        })
        .collect()
}

pub fn render(cues: &[SubtitleCue], placeholder: &str) -> String {
    let mut out = String::new();
    for cue in cues {
        // Writing into a String cannot fail.
        let _ = write!(
            out,
            "{}\n{} --> {}\n{}\n\n",
            cue.index,
            format_timestamp(cue.start, placeholder),
            format_timestamp(cue.end, placeholder),
            cue.text
        );
    }
    out
}
