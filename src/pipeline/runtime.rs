use crate::alignment::boundaries::extract_boundaries;
use crate::alignment::gaps::distribute_gaps;
use crate::alignment::remap::remap;
use crate::alignment::streams::flatten;
use crate::config::SrtGenConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::AlignmentError;
use crate::pipeline::traits::{ScriptSegmenter, SequenceAligner};
use crate::recognizer::validate_tokens;
use crate::types::{AlignmentInput, AlignmentOutput, RecognizedToken, ScriptSentence};

pub struct SubtitleAligner {
    config: SrtGenConfig,
    segmenter: Box<dyn ScriptSegmenter>,
    sequence_aligner: Box<dyn SequenceAligner>,
}

pub(crate) struct SubtitleAlignerParts {
    pub config: SrtGenConfig,
    pub segmenter: Box<dyn ScriptSegmenter>,
    pub sequence_aligner: Box<dyn SequenceAligner>,
}

impl SubtitleAligner {
    pub(crate) fn from_parts(parts: SubtitleAlignerParts) -> Self {
        Self {
            config: parts.config,
            segmenter: parts.segmenter,
            sequence_aligner: parts.sequence_aligner,
        }
    }

    pub fn config(&self) -> &SrtGenConfig {
        &self.config
    }

    pub fn segment(&self, text: &str) -> Vec<ScriptSentence> {
        self.segmenter.segment(text)
    }

    /// Segments the transcript and aligns it against the recognized tokens.
    pub fn align(
        &self,
        input: &AlignmentInput,
        diagnostics: &mut Diagnostics,
    ) -> Result<AlignmentOutput, AlignmentError> {
        if input.transcript.trim().is_empty() {
            return Err(AlignmentError::invalid_input("script is empty"));
        }
        let sentences = self.segment(&input.transcript);
        self.align_sentences(&sentences, &input.tokens, diagnostics)
    }

    /// Runs the stages in order: flatten, align, remap, distribute gaps,
    /// extract boundaries. Each stage returns fresh values.
    pub fn align_sentences(
        &self,
        sentences: &[ScriptSentence],
        tokens: &[RecognizedToken],
        diagnostics: &mut Diagnostics,
    ) -> Result<AlignmentOutput, AlignmentError> {
        if sentences.is_empty() {
            return Err(AlignmentError::invalid_input("script has no sentences"));
        }
        validate_tokens(tokens)?;
        if tokens.is_empty() {
            diagnostics.record(Diagnostic::EmptyRecognition);
        }

        let streams = flatten(sentences, tokens);
        let steps = self
            .sequence_aligner
            .align(&streams.script_texts(), &streams.recognized_texts())?;
        tracing::debug!(
            sentences = streams.sentence_count(),
            script_words = streams.script_words.len(),
            recognized = streams.recognized.len(),
            steps = steps.len(),
            "pipeline: aligned"
        );

        let remapped = remap(sentences, &streams, &steps, diagnostics);
        let (distributed, gaps) = distribute_gaps(remapped, streams.recognized.len(), diagnostics);
        let timings = extract_boundaries(sentences, distributed, &streams.recognized, diagnostics);

        Ok(AlignmentOutput {
            sentences: timings,
            gaps,
            recognized: streams.recognized,
        })
    }
}
