use serde::{Deserialize, Serialize};

/// A script sentence as produced by a segmenter: original text plus its
/// normalized words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptSentence {
    pub text: String,
    pub words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptWord {
    pub text: String,
    pub sentence_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognizedToken {
    pub text: String,
    pub start_pos: f64,
    pub end_pos: f64,
}

impl RecognizedToken {
    pub fn new(text: impl Into<String>, start_pos: f64, end_pos: f64) -> Self {
        Self {
            text: text.into(),
            start_pos,
            end_pos,
        }
    }
}

/// One step of an alignment. Indices point into the flat script and
/// recognized streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentStep {
    Match { script: usize, recognized: usize },
    ScriptOnly(usize),
    RecognizedOnly(usize),
}

impl AlignmentStep {
    pub fn script(self) -> Option<usize> {
        match self {
            Self::Match { script, .. } | Self::ScriptOnly(script) => Some(script),
            Self::RecognizedOnly(_) => None,
        }
    }

    pub fn recognized(self) -> Option<usize> {
        match self {
            Self::Match { recognized, .. } | Self::RecognizedOnly(recognized) => Some(recognized),
            Self::ScriptOnly(_) => None,
        }
    }
}

/// A script word and the recognized token it resolved to, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentEntry {
    pub word: String,
    /// Index into the recognized stream.
    pub token: Option<usize>,
}

impl AlignmentEntry {
    pub fn unresolved(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            token: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.token.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RemappedSentence {
    pub entries: Vec<AlignmentEntry>,
}

impl RemappedSentence {
    pub fn leading_unresolved(&self) -> usize {
        self.entries.iter().take_while(|e| !e.is_resolved()).count()
    }

    pub fn trailing_unresolved(&self) -> usize {
        self.entries
            .iter()
            .rev()
            .take_while(|e| !e.is_resolved())
            .count()
    }

    pub fn first_claimed(&self) -> Option<usize> {
        self.entries.iter().find_map(|e| e.token)
    }

    pub fn last_claimed(&self) -> Option<usize> {
        self.entries.iter().rev().find_map(|e| e.token)
    }
}

/// Final timing of one script sentence, in recognizer position units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceTiming {
    /// 1-based, in script order.
    pub index: usize,
    pub text: String,
    pub entries: Vec<AlignmentEntry>,
    pub start_pos: Option<f64>,
    pub end_pos: Option<f64>,
    /// Unresolved words before the first resolved one.
    pub late_start: usize,
    /// Unresolved words after the last resolved one.
    pub early_end: usize,
}

impl SentenceTiming {
    pub fn is_resolved(&self) -> bool {
        self.start_pos.is_some() && self.end_pos.is_some()
    }

    pub fn resolved_words(&self) -> usize {
        self.entries.iter().filter(|e| e.is_resolved()).count()
    }
}

#[derive(Debug, Clone)]
pub struct AlignmentInput {
    pub transcript: String,
    pub tokens: Vec<RecognizedToken>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentOutput {
    pub sentences: Vec<SentenceTiming>,
    pub gaps: Vec<crate::alignment::gaps::BoundaryGap>,
    pub recognized: Vec<RecognizedToken>,
}
