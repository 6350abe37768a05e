use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use srtgen_rs::{
    AlignerKind, AlignmentOutput, Diagnostics, RecognizedToken, ScriptSentence, SrtGenConfig,
    SubtitleAligner, SubtitleAlignerBuilder, Verbosity,
};

const SEED: u64 = 42;
const CASES: usize = 200;
const VOCABULARY: [&str; 12] = [
    "the", "a", "cat", "dog", "sat", "ran", "on", "under", "mat", "table", "quickly", "home",
];

struct Case {
    sentences: Vec<ScriptSentence>,
    tokens: Vec<RecognizedToken>,
}

fn random_sentences(rng: &mut StdRng) -> Vec<ScriptSentence> {
    let count = rng.gen_range(1..7);
    (0..count)
        .map(|_| {
            // Occasionally a sentence with no words, such as a line of dashes.
            let len = if rng.gen_bool(0.08) {
                0
            } else {
                rng.gen_range(1..8)
            };
            let words: Vec<String> = (0..len)
                .map(|_| VOCABULARY[rng.gen_range(0..VOCABULARY.len())].to_string())
                .collect();
            ScriptSentence {
                text: if words.is_empty() {
                    "---".to_string()
                } else {
                    format!("{}.", words.join(" "))
                },
                words,
            }
        })
        .collect()
}

/// Simulates a recognizer that drops, substitutes and inserts words.
fn noisy_tokens(rng: &mut StdRng, sentences: &[ScriptSentence]) -> Vec<RecognizedToken> {
    let mut tokens = Vec::new();
    let mut pos = 0.0;
    let mut push = |text: String, rng: &mut StdRng| {
        let len = rng.gen_range(5.0..40.0);
        tokens.push(RecognizedToken::new(text, pos, pos + len));
        pos += len + rng.gen_range(0.0..15.0);
    };
    for word in sentences.iter().flat_map(|s| &s.words) {
        if rng.gen_bool(0.1) {
            push(format!("noise{}", rng.gen_range(0..5)), rng);
        }
        let roll: f64 = rng.gen();
        if roll < 0.2 {
            continue;
        }
        if roll < 0.35 {
            push(VOCABULARY[rng.gen_range(0..VOCABULARY.len())].to_string(), rng);
        } else {
            push(word.clone(), rng);
        }
    }
    tokens
}

fn cases() -> Vec<Case> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..CASES)
        .map(|_| {
            let sentences = random_sentences(&mut rng);
            let tokens = noisy_tokens(&mut rng, &sentences);
            Case { sentences, tokens }
        })
        .collect()
}

fn aligner(kind: AlignerKind) -> SubtitleAligner {
    SubtitleAlignerBuilder::new(SrtGenConfig::default())
        .with_aligner_kind(kind)
        .build()
        .expect("default config is valid")
}

fn run(aligner: &SubtitleAligner, case: &Case) -> (AlignmentOutput, Diagnostics) {
    let mut diagnostics = Diagnostics::new(Verbosity::Quiet);
    let output = aligner
        .align_sentences(&case.sentences, &case.tokens, &mut diagnostics)
        .expect("random cases are valid input");
    (output, diagnostics)
}

fn each_strategy(check: impl Fn(&Case, &AlignmentOutput, &Diagnostics)) {
    for kind in [AlignerKind::Global, AlignerKind::MatchingBlocks] {
        let aligner = aligner(kind);
        for case in cases() {
            let (output, diagnostics) = run(&aligner, &case);
            check(&case, &output, &diagnostics);
        }
    }
}

#[test]
fn every_word_gets_exactly_one_entry_in_order() {
    each_strategy(|case, output, diagnostics| {
        assert_eq!(output.sentences.len(), case.sentences.len());
        for (sentence, timing) in case.sentences.iter().zip(&output.sentences) {
            let words: Vec<&str> = timing.entries.iter().map(|e| e.word.as_str()).collect();
            assert_eq!(words, sentence.words);
        }
        assert_eq!(diagnostics.desync_count(), 0);
    });
}

#[test]
fn no_token_is_claimed_twice() {
    each_strategy(|_, output, _| {
        let mut seen = HashSet::new();
        for token in output
            .sentences
            .iter()
            .flat_map(|s| &s.entries)
            .filter_map(|e| e.token)
        {
            assert!(seen.insert(token), "token {token} claimed twice");
        }
    });
}

#[test]
fn claims_follow_script_order() {
    each_strategy(|_, output, _| {
        let claims: Vec<usize> = output
            .sentences
            .iter()
            .flat_map(|s| &s.entries)
            .filter_map(|e| e.token)
            .collect();
        assert!(claims.windows(2).all(|w| w[0] < w[1]), "{claims:?}");
    });
}

#[test]
fn sentence_spans_are_ordered_and_well_formed() {
    each_strategy(|_, output, _| {
        let mut last_end = f64::NEG_INFINITY;
        for timing in output.sentences.iter().filter(|t| t.is_resolved()) {
            let (Some(start), Some(end)) = (timing.start_pos, timing.end_pos) else {
                unreachable!("filtered on resolved");
            };
            assert!(start <= end, "sentence {} spans {start}..{end}", timing.index);
            assert!(start >= last_end, "sentence {} starts before its predecessor ends", timing.index);
            last_end = end;
        }
    });
}

#[test]
fn unknown_sentences_have_no_position_on_either_side() {
    each_strategy(|_, output, _| {
        for timing in &output.sentences {
            assert_eq!(timing.start_pos.is_some(), timing.end_pos.is_some());
            if timing.resolved_words() == 0 {
                assert!(!timing.is_resolved());
            }
        }
    });
}

#[test]
fn alignment_is_deterministic() {
    for kind in [AlignerKind::Auto, AlignerKind::Global, AlignerKind::MatchingBlocks] {
        let aligner = aligner(kind);
        for case in cases().iter().take(50) {
            let (first, first_diag) = run(&aligner, case);
            let (second, second_diag) = run(&aligner, case);
            assert_eq!(first, second);
            assert_eq!(first_diag.events(), second_diag.events());
        }
    }
}

#[test]
fn perfect_recognition_resolves_every_sentence_with_words() {
    let mut rng = StdRng::seed_from_u64(SEED);
    for _ in 0..50 {
        let sentences = random_sentences(&mut rng);
        let tokens: Vec<RecognizedToken> = sentences
            .iter()
            .flat_map(|s| &s.words)
            .enumerate()
            .map(|(i, w)| RecognizedToken::new(w.clone(), i as f64 * 10.0, i as f64 * 10.0 + 8.0))
            .collect();
        let case = Case { sentences, tokens };
        for kind in [AlignerKind::Global, AlignerKind::MatchingBlocks] {
            let (output, _) = run(&aligner(kind), &case);
            for (sentence, timing) in case.sentences.iter().zip(&output.sentences) {
                assert_eq!(timing.is_resolved(), !sentence.words.is_empty());
                assert_eq!(timing.resolved_words(), sentence.words.len());
                assert_eq!((timing.late_start, timing.early_end), (0, 0));
            }
        }
    }
}
