use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::types::{RecognizedToken, RemappedSentence, ScriptSentence, SentenceTiming};

/// Builds the final per-sentence timing: start of the first resolved token and
/// end of the last one. Sentences with nothing resolved keep `None` on both
/// sides.
pub fn extract_boundaries(
    script: &[ScriptSentence],
    sentences: Vec<RemappedSentence>,
    recognized: &[RecognizedToken],
    diagnostics: &mut Diagnostics,
) -> Vec<SentenceTiming> {
    script
        .iter()
        .zip(sentences)
        .enumerate()
        .map(|(idx, (source, remapped))| {
            let entries = remapped.entries;
            let first = entries
                .iter()
                .enumerate()
                .find_map(|(i, e)| e.token.map(|t| (i, t)));
            let last = entries
                .iter()
                .rev()
                .enumerate()
                .find_map(|(i, e)| e.token.map(|t| (i, t)));

            let (start_pos, late_start) = match first {
                Some((i, t)) => (recognized.get(t).map(|tok| tok.start_pos), i),
                None => (None, 0),
            };
            let (end_pos, early_end) = match last {
                Some((i, t)) => (recognized.get(t).map(|tok| tok.end_pos), i),
                None => (None, 0),
            };

            if start_pos.is_none() || end_pos.is_none() {
                diagnostics.record(Diagnostic::UnknownSentence { sentence: idx });
            } else {
                if late_start > 0 {
                    diagnostics.record(Diagnostic::LateStart {
                        sentence: idx,
                        words: late_start,
                    });
                }
                if early_end > 0 {
                    diagnostics.record(Diagnostic::EarlyEnd {
                        sentence: idx,
                        words: early_end,
                    });
                }
            }

            SentenceTiming {
                index: idx + 1,
                text: source.text.clone(),
                entries,
                start_pos,
                end_pos,
                late_start,
                early_end,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Verbosity;
    use crate::types::AlignmentEntry;

    fn script(text: &str, words: usize) -> ScriptSentence {
        ScriptSentence {
            text: text.to_string(),
            words: (0..words).map(|i| format!("w{i}")).collect(),
        }
    }

    fn remapped(tokens: &[Option<usize>]) -> RemappedSentence {
        RemappedSentence {
            entries: tokens
                .iter()
                .map(|&token| AlignmentEntry {
                    word: "w".to_string(),
                    token,
                })
                .collect(),
        }
    }

    fn recognized() -> Vec<RecognizedToken> {
        (0..6)
            .map(|i| RecognizedToken::new("x", i as f64 * 10.0, i as f64 * 10.0 + 5.0))
            .collect()
    }

    #[test]
    fn start_and_end_come_from_outermost_resolved_entries() {
        let mut diagnostics = Diagnostics::new(Verbosity::Quiet);
        let timings = extract_boundaries(
            &[script("One.", 4)],
            vec![remapped(&[None, Some(1), None, Some(3)])],
            &recognized(),
            &mut diagnostics,
        );
        let t = &timings[0];
        assert_eq!(t.index, 1);
        assert_eq!(t.text, "One.");
        assert_eq!(t.start_pos, Some(10.0));
        assert_eq!(t.end_pos, Some(35.0));
        assert_eq!((t.late_start, t.early_end), (1, 0));
        assert_eq!(
            diagnostics.events(),
            [Diagnostic::LateStart {
                sentence: 0,
                words: 1
            }]
        );
    }

    #[test]
    fn unresolved_sentence_is_unknown_not_zero() {
        let mut diagnostics = Diagnostics::new(Verbosity::Quiet);
        let timings = extract_boundaries(
            &[script("Lost.", 2), script("Found.", 1)],
            vec![remapped(&[None, None]), remapped(&[Some(5)])],
            &recognized(),
            &mut diagnostics,
        );
        assert_eq!(timings[0].start_pos, None);
        assert_eq!(timings[0].end_pos, None);
        assert!(!timings[0].is_resolved());
        assert_eq!(timings[1].start_pos, Some(50.0));
        assert_eq!(timings[1].end_pos, Some(55.0));
        assert_eq!(timings[1].index, 2);
        assert_eq!(
            diagnostics.events(),
            [Diagnostic::UnknownSentence { sentence: 0 }]
        );
    }

    #[test]
    fn early_end_counts_trailing_unresolved_words() {
        let mut diagnostics = Diagnostics::new(Verbosity::Quiet);
        let timings = extract_boundaries(
            &[script("Tail.", 3)],
            vec![remapped(&[Some(0), None, None])],
            &recognized(),
            &mut diagnostics,
        );
        assert_eq!(timings[0].early_end, 2);
        assert_eq!(timings[0].start_pos, Some(0.0));
        assert_eq!(timings[0].end_pos, Some(5.0));
    }
}
