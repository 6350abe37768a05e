use serde::Deserialize;

use crate::config::SrtGenConfig;
use crate::error::AlignmentError;
use crate::pipeline::defaults::{
    AutoSequenceAligner, GlobalSequenceAligner, MatchingBlockAligner, PunctuationSegmenter,
};
use crate::pipeline::runtime::{SubtitleAligner, SubtitleAlignerParts};
use crate::pipeline::traits::{ScriptSegmenter, SequenceAligner};

/// Which built-in sequence aligner to use when none is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignerKind {
    #[default]
    Auto,
    Global,
    MatchingBlocks,
}

impl AlignerKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Global => "global",
            Self::MatchingBlocks => "matching-blocks",
        }
    }
}

pub struct SubtitleAlignerBuilder {
    config: SrtGenConfig,
    aligner_kind: AlignerKind,
    segmenter: Option<Box<dyn ScriptSegmenter>>,
    sequence_aligner: Option<Box<dyn SequenceAligner>>,
}

impl SubtitleAlignerBuilder {
    pub fn new(config: SrtGenConfig) -> Self {
        Self {
            config,
            aligner_kind: AlignerKind::Auto,
            segmenter: None,
            sequence_aligner: None,
        }
    }

    pub fn with_aligner_kind(mut self, aligner_kind: AlignerKind) -> Self {
        self.aligner_kind = aligner_kind;
        self
    }

    pub fn with_segmenter(mut self, segmenter: Box<dyn ScriptSegmenter>) -> Self {
        self.segmenter = Some(segmenter);
        self
    }

    pub fn with_sequence_aligner(mut self, sequence_aligner: Box<dyn SequenceAligner>) -> Self {
        self.sequence_aligner = Some(sequence_aligner);
        self
    }

    pub fn build(self) -> Result<SubtitleAligner, AlignmentError> {
        self.config.validate()?;

        let sequence_aligner = if let Some(sequence_aligner) = self.sequence_aligner {
            sequence_aligner
        } else {
            build_sequence_aligner(self.aligner_kind, &self.config)
        };

        Ok(SubtitleAligner::from_parts(SubtitleAlignerParts {
            segmenter: self
                .segmenter
                .unwrap_or_else(|| Box::new(PunctuationSegmenter)),
            sequence_aligner,
            config: self.config,
        }))
    }
}

fn build_sequence_aligner(kind: AlignerKind, config: &SrtGenConfig) -> Box<dyn SequenceAligner> {
    tracing::debug!(strategy = kind.label(), "builder: sequence aligner");
    match kind {
        AlignerKind::Auto => Box::new(AutoSequenceAligner::new(config.aligner.clone())),
        AlignerKind::Global => Box::new(GlobalSequenceAligner::new(config.aligner.clone())),
        AlignerKind::MatchingBlocks => Box::new(MatchingBlockAligner),
    }
}
