use crate::types::ScriptSentence;

const TERMINATORS: &[char] = &['.', '!', '?'];
const CLOSERS: &[char] = &['"', '\'', '\u{201d}', '\u{2019}', ')', ']', '}', '\u{bb}'];

/// Lower-cases and keeps alphanumerics and apostrophes. The segmenter and the
/// recognizer loader share this so both streams compare on equal terms.
pub fn normalize_word(raw: &str) -> String {
    raw.chars()
        .filter(|c| is_word_char(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\'' || c == '\u{2019}'
}

/// Maximal runs of word characters, normalized.
pub fn split_words(text: &str) -> Vec<String> {
    text.split(|c: char| !is_word_char(c))
        .map(normalize_word)
        .filter(|w| !w.is_empty())
        .collect()
}

/// Splits a script into sentences on terminal punctuation (plus trailing
/// closing quotes or brackets) followed by whitespace, and on newlines.
pub fn segment_sentences(text: &str) -> Vec<ScriptSentence> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut cuts: Vec<(usize, usize)> = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        let (offset, c) = chars[i];
        if c == '\n' || c == '\r' {
            cuts.push((start, offset));
            start = offset + c.len_utf8();
            i += 1;
            continue;
        }
        if TERMINATORS.contains(&c) {
            let mut j = i + 1;
            while j < chars.len() && TERMINATORS.contains(&chars[j].1) {
                j += 1;
            }
            while j < chars.len() && CLOSERS.contains(&chars[j].1) {
                j += 1;
            }
            let at_boundary = j == chars.len() || chars[j].1.is_whitespace();
            if at_boundary {
                let end = chars.get(j).map_or(text.len(), |(o, _)| *o);
                cuts.push((start, end));
                start = end;
            }
            i = j;
            continue;
        }
        i += 1;
    }
    cuts.push((start, text.len()));

    let sentences: Vec<ScriptSentence> = cuts
        .into_iter()
        .map(|(s, e)| text[s..e].trim())
        .filter(|segment| !segment.is_empty())
        .map(|segment| ScriptSentence {
            text: segment.to_string(),
            words: split_words(segment),
        })
        .collect();

    tracing::debug!(sentences = sentences.len(), "segment: script split");
    sentences
}
