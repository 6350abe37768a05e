use crate::alignment::streams::TokenStreams;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::types::{AlignmentEntry, AlignmentStep, RemappedSentence, ScriptSentence};

/// Cursor over the script in sentence order, skipping sentences without words.
struct SentenceCursor<'a> {
    sentences: &'a [ScriptSentence],
    sentence: usize,
    word: usize,
}

impl<'a> SentenceCursor<'a> {
    fn new(sentences: &'a [ScriptSentence]) -> Self {
        let mut cursor = Self {
            sentences,
            sentence: 0,
            word: 0,
        };
        cursor.skip_empty();
        cursor
    }

    fn skip_empty(&mut self) {
        while self
            .sentences
            .get(self.sentence)
            .is_some_and(|s| s.words.is_empty())
        {
            self.sentence += 1;
        }
    }

    fn expected(&self) -> Option<&'a str> {
        self.sentences
            .get(self.sentence)
            .and_then(|s| s.words.get(self.word))
            .map(String::as_str)
    }

    fn advance(&mut self) {
        self.word += 1;
        if self.word >= self.sentences[self.sentence].words.len() {
            self.word = 0;
            self.sentence += 1;
            self.skip_empty();
        }
    }

    fn is_done(&self) -> bool {
        self.sentence >= self.sentences.len()
    }
}

/// Re-attaches every script-bearing alignment step to the sentence that owns
/// its word. Recognized-only steps attach to nothing and are dropped.
pub fn remap(
    sentences: &[ScriptSentence],
    streams: &TokenStreams,
    alignment: &[AlignmentStep],
    diagnostics: &mut Diagnostics,
) -> Vec<RemappedSentence> {
    let mut remapped: Vec<RemappedSentence> = sentences
        .iter()
        .map(|s| RemappedSentence {
            entries: Vec::with_capacity(s.words.len()),
        })
        .collect();
    let mut cursor = SentenceCursor::new(sentences);

    for step in alignment {
        let Some(script_index) = step.script() else {
            continue;
        };
        let found = streams
            .script_words
            .get(script_index)
            .map(|w| w.text.as_str());

        if cursor.is_done() {
            diagnostics.record(Diagnostic::Desync {
                sentence: sentences.len().saturating_sub(1),
                word_index: script_index,
                expected: None,
                found: found.map(str::to_string),
            });
            continue;
        }

        let expected_index = streams.sentence_range(cursor.sentence).start + cursor.word;
        let expected = cursor.expected();
        if script_index != expected_index || found != expected {
            diagnostics.record(Diagnostic::Desync {
                sentence: cursor.sentence,
                word_index: cursor.word,
                expected: expected.map(str::to_string),
                found: found.map(str::to_string),
            });
        }

        let word = found.or(expected).unwrap_or_default();
        tracing::trace!(
            sentence = cursor.sentence,
            word,
            token = ?step.recognized(),
            "remap: entry"
        );
        remapped[cursor.sentence].entries.push(AlignmentEntry {
            word: word.to_string(),
            token: step.recognized(),
        });
        cursor.advance();
    }

    if !cursor.is_done() {
        diagnostics.record(Diagnostic::Desync {
            sentence: cursor.sentence,
            word_index: cursor.word,
            expected: cursor.expected().map(str::to_string),
            found: None,
        });
        while !cursor.is_done() {
            if let Some(word) = cursor.expected() {
                remapped[cursor.sentence]
                    .entries
                    .push(AlignmentEntry::unresolved(word));
            }
            cursor.advance();
        }
    }

    remapped
}
