use crate::error::AlignmentError;
use crate::types::{AlignmentStep, ScriptSentence};

/// Splits a script into sentences of normalized words.
pub trait ScriptSegmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<ScriptSentence>;
}

/// Aligns the flat script words against the flat recognized tokens.
///
/// Implementations must return steps that, read left to right, visit every
/// script index and every recognized index exactly once and in order.
pub trait SequenceAligner: Send + Sync {
    fn align(
        &self,
        script: &[&str],
        recognized: &[&str],
    ) -> Result<Vec<AlignmentStep>, AlignmentError>;
}
