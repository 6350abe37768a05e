//! Loading recognizer output.
//!
//! The recognizer itself runs elsewhere; this module reads its token dump,
//! strips the markers it emits for silence and noise, and normalizes words the
//! same way the script segmenter does.

use std::path::Path;

use serde::Deserialize;

use crate::alignment::tokenization::split_words;
use crate::error::AlignmentError;
use crate::types::RecognizedToken;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawToken {
    Object {
        #[serde(alias = "text")]
        word: String,
        #[serde(alias = "start_pos")]
        start: f64,
        #[serde(alias = "end_pos")]
        end: f64,
    },
    Triple(String, f64, f64),
}

impl From<RawToken> for RecognizedToken {
    fn from(raw: RawToken) -> Self {
        match raw {
            RawToken::Object { word, start, end } | RawToken::Triple(word, start, end) => {
                RecognizedToken::new(word, start, end)
            }
        }
    }
}

pub fn load_tokens(path: &Path) -> Result<Vec<RecognizedToken>, AlignmentError> {
    let data =
        std::fs::read_to_string(path).map_err(|e| AlignmentError::io("read recognizer tokens", e))?;
    parse_tokens(&data)
}

/// Parses, normalizes and validates a JSON token dump.
pub fn parse_tokens(json: &str) -> Result<Vec<RecognizedToken>, AlignmentError> {
    let raw: Vec<RawToken> =
        serde_json::from_str(json).map_err(|e| AlignmentError::json("parse recognizer tokens", e))?;
    let tokens = normalize_tokens(raw.into_iter().map(RecognizedToken::from));
    validate_tokens(&tokens)?;
    Ok(tokens)
}

fn is_marker(word: &str) -> bool {
    (word.starts_with('<') && word.ends_with('>'))
        || (word.starts_with('[') && word.ends_with(']'))
        || (word.len() >= 4 && word.starts_with("++") && word.ends_with("++"))
}

/// Drops silence and noise markers, strips alternate-pronunciation suffixes
/// such as `word(2)` and normalizes what is left.
///
/// A token that holds several script words, like `well-known` or `3.5`, is
/// split on the same boundaries the segmenter uses. Every piece keeps the
/// span of the token it came from.
pub fn normalize_tokens(
    tokens: impl IntoIterator<Item = RecognizedToken>,
) -> Vec<RecognizedToken> {
    let mut dropped = 0usize;
    let mut split = 0usize;
    let mut kept = Vec::new();
    for token in tokens {
        let trimmed = token.text.trim();
        if is_marker(trimmed) {
            dropped += 1;
            continue;
        }
        let base = trimmed.split('(').next().unwrap_or_default();
        let words = split_words(base);
        match words.len() {
            0 => dropped += 1,
            1 => {}
            _ => split += 1,
        }
        kept.extend(
            words
                .into_iter()
                .map(|word| RecognizedToken::new(word, token.start_pos, token.end_pos)),
        );
    }

    tracing::debug!(kept = kept.len(), dropped, split, "recognizer: tokens normalized");
    kept
}

/// Positions must be finite, non-decreasing by start, and never end before
/// they start.
pub fn validate_tokens(tokens: &[RecognizedToken]) -> Result<(), AlignmentError> {
    let mut previous_start = f64::NEG_INFINITY;
    for (i, token) in tokens.iter().enumerate() {
        if !token.start_pos.is_finite() || !token.end_pos.is_finite() {
            return Err(AlignmentError::invalid_input(format!(
                "token {i} ('{}') has a non-finite position",
                token.text
            )));
        }
        if token.end_pos < token.start_pos {
            return Err(AlignmentError::invalid_input(format!(
                "token {i} ('{}') ends at {} before it starts at {}",
                token.text, token.end_pos, token.start_pos
            )));
        }
        if token.start_pos < previous_start {
            return Err(AlignmentError::invalid_input(format!(
                "token {i} ('{}') starts at {} before the previous token at {}",
                token.text, token.start_pos, previous_start
            )));
        }
        previous_start = token.start_pos;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[RecognizedToken]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn parses_objects_with_either_field_names() {
        let tokens = parse_tokens(
            r#"[
                {"word": "Hello", "start": 0, "end": 20},
                {"text": "world", "start_pos": 25.0, "end_pos": 40.0}
            ]"#,
        )
        .unwrap();
        assert_eq!(texts(&tokens), ["hello", "world"]);
        assert_eq!(tokens[1].start_pos, 25.0);
        assert_eq!(tokens[1].end_pos, 40.0);
    }

    #[test]
    fn parses_triples() {
        let tokens = parse_tokens(r#"[["the", 0, 10], ["cat(2)", 12, 30]]"#).unwrap();
        assert_eq!(texts(&tokens), ["the", "cat"]);
    }

    #[test]
    fn drops_silence_and_noise_markers() {
        let tokens = normalize_tokens(vec![
            RecognizedToken::new("<s>", 0.0, 1.0),
            RecognizedToken::new("<sil>", 1.0, 5.0),
            RecognizedToken::new("word", 5.0, 9.0),
            RecognizedToken::new("[NOISE]", 9.0, 10.0),
            RecognizedToken::new("++BREATH++", 10.0, 12.0),
            RecognizedToken::new("...", 12.0, 13.0),
            RecognizedToken::new("</s>", 13.0, 14.0),
        ]);
        assert_eq!(texts(&tokens), ["word"]);
        assert_eq!(tokens[0].start_pos, 5.0);
    }

    #[test]
    fn compound_tokens_split_like_the_script_text() {
        let tokens = parse_tokens(
            r#"[["it", 0, 1], ["was", 1, 2], ["well-known", 2, 4], ["3.5", 4, 6], ["-", 6, 7]]"#,
        )
        .unwrap();
        assert_eq!(texts(&tokens), ["it", "was", "well", "known", "3", "5"]);
        let spans: Vec<(f64, f64)> = tokens[2..]
            .iter()
            .map(|t| (t.start_pos, t.end_pos))
            .collect();
        assert_eq!(spans, [(2.0, 4.0), (2.0, 4.0), (4.0, 6.0), (4.0, 6.0)]);
    }

    #[test]
    fn rejects_unordered_or_inverted_tokens() {
        assert!(matches!(
            parse_tokens(r#"[["a", 10, 5]]"#),
            Err(AlignmentError::InvalidInput { .. })
        ));
        assert!(matches!(
            parse_tokens(r#"[["a", 10, 20], ["b", 5, 30]]"#),
            Err(AlignmentError::InvalidInput { .. })
        ));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(
            parse_tokens(r#"{"word": "a"}"#),
            Err(AlignmentError::Json { .. })
        ));
    }

    #[test]
    fn empty_dump_is_accepted() {
        assert!(parse_tokens("[]").unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load_tokens(Path::new("/nonexistent/tokens.json"));
        assert!(matches!(result, Err(AlignmentError::Io { .. })));
    }
}
