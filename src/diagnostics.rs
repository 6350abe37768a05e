//! Observational signals raised while aligning.
//!
//! Every pipeline stage receives a `&mut Diagnostics`. Events are always
//! recorded; whether they are also emitted through `tracing` depends on the
//! configured [`Verbosity`].

use serde::Serialize;

use crate::alignment::gaps::BoundaryGap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Record only.
    Quiet,
    /// Emit warnings.
    #[default]
    Normal,
    /// Emit warnings and per-sentence observations.
    Verbose,
}

impl Verbosity {
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose > 0 {
            Self::Verbose
        } else {
            Self::Normal
        }
    }
}

/// Sentence indices are 0-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The aligner handed the remapper a word that is not the next word of the
    /// current sentence.
    Desync {
        sentence: usize,
        word_index: usize,
        expected: Option<String>,
        found: Option<String>,
    },
    EmptyRecognition,
    UnknownSentence {
        sentence: usize,
    },
    LateStart {
        sentence: usize,
        words: usize,
    },
    EarlyEnd {
        sentence: usize,
        words: usize,
    },
    Gap(BoundaryGap),
}

impl Diagnostic {
    fn is_warning(&self) -> bool {
        match self {
            Self::Desync { .. } | Self::EmptyRecognition | Self::UnknownSentence { .. } => true,
            Self::Gap(gap) => gap.outcome.left_unresolved(),
            Self::LateStart { .. } | Self::EarlyEnd { .. } => false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    verbosity: Verbosity,
    events: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            events: Vec::new(),
        }
    }

    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    pub fn desync_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Diagnostic::Desync { .. }))
            .count()
    }

    pub fn record(&mut self, event: Diagnostic) {
        let emit = match self.verbosity {
            Verbosity::Quiet => false,
            Verbosity::Normal => event.is_warning(),
            Verbosity::Verbose => true,
        };
        if emit {
            emit_event(&event);
        }
        self.events.push(event);
    }
}

fn emit_event(event: &Diagnostic) {
    match event {
        Diagnostic::Desync {
            sentence,
            word_index,
            expected,
            found,
        } => tracing::warn!(
            sentence = sentence + 1,
            word_index,
            expected = expected.as_deref().unwrap_or("<none>"),
            found = found.as_deref().unwrap_or("<none>"),
            "remap: aligned word does not match the sentence; trusting the aligner"
        ),
        Diagnostic::EmptyRecognition => {
            tracing::warn!("pipeline: no recognized tokens; every sentence will be unknown")
        }
        Diagnostic::UnknownSentence { sentence } => tracing::warn!(
            sentence = sentence + 1,
            "boundaries: no word of the sentence was recognized"
        ),
        Diagnostic::LateStart { sentence, words } => tracing::info!(
            "Sentence {} has a late start of {} words",
            sentence + 1,
            words
        ),
        Diagnostic::EarlyEnd { sentence, words } => tracing::info!(
            "Sentence {} has an early end of {} words",
            sentence + 1,
            words
        ),
        Diagnostic::Gap(gap) => {
            if gap.outcome.left_unresolved() {
                tracing::warn!(
                    previous = gap.previous + 1,
                    next = gap.next + 1,
                    outcome = ?gap.outcome,
                    "gaps: boundary word left unresolved"
                );
            } else {
                tracing::info!(
                    previous = gap.previous + 1,
                    next = gap.next + 1,
                    outcome = ?gap.outcome,
                    "gaps: boundary outcome"
                );
            }
        }
    }
}
