use crate::alignment::global::{align_global, grid_cells};
use crate::alignment::matching_blocks::align_matching_blocks;
use crate::alignment::tokenization::segment_sentences;
use crate::config::AlignerConfig;
use crate::error::AlignmentError;
use crate::pipeline::traits::{ScriptSegmenter, SequenceAligner};
use crate::types::{AlignmentStep, ScriptSentence};

pub struct PunctuationSegmenter;

impl ScriptSegmenter for PunctuationSegmenter {
    fn segment(&self, text: &str) -> Vec<ScriptSentence> {
        segment_sentences(text)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GlobalSequenceAligner {
    config: AlignerConfig,
}

impl GlobalSequenceAligner {
    pub fn new(config: AlignerConfig) -> Self {
        Self { config }
    }
}

impl SequenceAligner for GlobalSequenceAligner {
    fn align(
        &self,
        script: &[&str],
        recognized: &[&str],
    ) -> Result<Vec<AlignmentStep>, AlignmentError> {
        align_global(script, recognized, &self.config)
    }
}

pub struct MatchingBlockAligner;

impl SequenceAligner for MatchingBlockAligner {
    fn align(
        &self,
        script: &[&str],
        recognized: &[&str],
    ) -> Result<Vec<AlignmentStep>, AlignmentError> {
        Ok(align_matching_blocks(script, recognized))
    }
}

/// Global alignment while the grid fits in `max_global_cells`, matching blocks
/// beyond that.
#[derive(Debug, Clone, Default)]
pub struct AutoSequenceAligner {
    config: AlignerConfig,
}

impl AutoSequenceAligner {
    pub fn new(config: AlignerConfig) -> Self {
        Self { config }
    }
}

impl SequenceAligner for AutoSequenceAligner {
    fn align(
        &self,
        script: &[&str],
        recognized: &[&str],
    ) -> Result<Vec<AlignmentStep>, AlignmentError> {
        let fits = grid_cells(script.len(), recognized.len())
            .is_some_and(|cells| cells <= self.config.max_global_cells);
        tracing::debug!(
            script_len = script.len(),
            recognized_len = recognized.len(),
            global = fits,
            "align: strategy selected"
        );
        if fits {
            align_global(script, recognized, &self.config)
        } else {
            Ok(align_matching_blocks(script, recognized))
        }
    }
}
