use crate::types::{RecognizedToken, ScriptSentence, ScriptWord};

/// Flat views of both inputs, ready for the sequence aligner.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenStreams {
    pub script_words: Vec<ScriptWord>,
    pub recognized: Vec<RecognizedToken>,
    /// Cumulative word counts; sentence `k` owns
    /// `sentence_offsets[k]..sentence_offsets[k + 1]`.
    pub sentence_offsets: Vec<usize>,
}

impl TokenStreams {
    pub fn sentence_count(&self) -> usize {
        self.sentence_offsets.len().saturating_sub(1)
    }

    pub fn sentence_range(&self, sentence: usize) -> std::ops::Range<usize> {
        self.sentence_offsets[sentence]..self.sentence_offsets[sentence + 1]
    }

    pub fn script_texts(&self) -> Vec<&str> {
        self.script_words.iter().map(|w| w.text.as_str()).collect()
    }

    pub fn recognized_texts(&self) -> Vec<&str> {
        self.recognized.iter().map(|t| t.text.as_str()).collect()
    }
}

pub fn flatten(sentences: &[ScriptSentence], recognized: &[RecognizedToken]) -> TokenStreams {
    let total_words = sentences.iter().map(|s| s.words.len()).sum();
    let mut script_words = Vec::with_capacity(total_words);
    let mut sentence_offsets = Vec::with_capacity(sentences.len() + 1);
    sentence_offsets.push(0);

    for (sentence_index, sentence) in sentences.iter().enumerate() {
        script_words.extend(sentence.words.iter().map(|word| ScriptWord {
            text: word.clone(),
            sentence_index,
        }));
        sentence_offsets.push(script_words.len());
    }

    TokenStreams {
        script_words,
        recognized: recognized.to_vec(),
        sentence_offsets,
    }
}
