pub mod alignment;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod pipeline;
pub mod recognizer;
pub mod srt;
pub mod timing;
pub mod types;

pub use config::{AlignerConfig, SrtGenConfig, TimingConfig};
pub use diagnostics::{Diagnostic, Diagnostics, Verbosity};
pub use error::AlignmentError;
pub use pipeline::builder::{AlignerKind, SubtitleAlignerBuilder};
pub use pipeline::runtime::SubtitleAligner;
pub use pipeline::traits::{ScriptSegmenter, SequenceAligner};
pub use timing::{Anchors, Calibration};
pub use types::{
    AlignmentEntry, AlignmentInput, AlignmentOutput, AlignmentStep, RecognizedToken,
    ScriptSentence, SentenceTiming,
};
