use serde::Serialize;

use crate::alignment::gaps::{BoundaryGap, GapOutcome, SideResolution};
use crate::diagnostics::Diagnostic;
use crate::timing::{format_timestamp, Calibration};
use crate::types::{AlignmentOutput, SentenceTiming};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub schema_version: u32,
    pub meta: Meta,
    pub sentences: Vec<SentenceReport>,
    pub gaps: Vec<GapReport>,
    pub aggregates: AggregateReport,
}

/// Describes the run that produced the report.
#[derive(Debug, Clone, Serialize)]
pub struct RunInfo {
    pub generated_at: String,
    pub script_path: String,
    pub tokens_path: String,
    pub strategy: String,
    pub anchored: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    #[serde(flatten)]
    pub run: RunInfo,
    pub frame_rate: f64,
    pub delay: f64,
    pub recognized_token_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentenceReport {
    pub index: usize,
    pub text: String,
    pub start_pos: Option<f64>,
    pub end_pos: Option<f64>,
    pub start: String,
    pub end: String,
    pub late_start: usize,
    pub early_end: usize,
    pub resolved_words: usize,
    pub total_words: usize,
    pub notes: Vec<String>,
}

/// Boundary outcome with 1-based sentence indices, matching `SentenceReport`.
#[derive(Debug, Clone, Serialize)]
pub struct GapReport {
    pub previous: usize,
    pub next: usize,
    pub outcome: GapOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateReport {
    pub sentences_total: u32,
    pub sentences_resolved: u32,
    pub sentences_unknown: u32,
    pub boundaries_with_gaps: u32,
    pub gaps_distributed: u32,
    pub sides_left_unresolved: u32,
    pub desync_count: u32,
    pub words_total: u32,
    pub words_resolved: u32,
    pub word_coverage_ratio: f64,
}

pub fn build_report(
    run: RunInfo,
    output: &AlignmentOutput,
    calibration: &Calibration,
    placeholder: &str,
    diagnostics: &[Diagnostic],
) -> Report {
    let sentences: Vec<SentenceReport> = output
        .sentences
        .iter()
        .map(|timing| sentence_report(timing, calibration, placeholder, diagnostics))
        .collect();
    let gaps = output
        .gaps
        .iter()
        .map(|gap| GapReport {
            previous: gap.previous + 1,
            next: gap.next + 1,
            outcome: gap.outcome.clone(),
        })
        .collect();
    let aggregates = aggregate(&output.sentences, &output.gaps, diagnostics);

    tracing::debug!(
        sentences = aggregates.sentences_total,
        unknown = aggregates.sentences_unknown,
        coverage = aggregates.word_coverage_ratio,
        "report: built"
    );

    Report {
        schema_version: SCHEMA_VERSION,
        meta: Meta {
            run,
            frame_rate: calibration.frame_rate,
            delay: calibration.delay,
            recognized_token_count: output.recognized.len(),
        },
        sentences,
        gaps,
        aggregates,
    }
}

fn sentence_report(
    timing: &SentenceTiming,
    calibration: &Calibration,
    placeholder: &str,
    diagnostics: &[Diagnostic],
) -> SentenceReport {
    let sentence = timing.index - 1;
    let mut notes = Vec::new();
    if !timing.is_resolved() {
        notes.push("unknown".to_string());
    }
    if timing.entries.is_empty() {
        notes.push("no_words".to_string());
    }
    let desyncs = diagnostics
        .iter()
        .filter(|d| matches!(d, Diagnostic::Desync { sentence: s, .. } if *s == sentence))
        .count();
    if desyncs > 0 {
        notes.push(format!("desync={desyncs}"));
    }

    SentenceReport {
        index: timing.index,
        text: timing.text.clone(),
        start_pos: timing.start_pos,
        end_pos: timing.end_pos,
        start: format_timestamp(calibration.seconds_opt(timing.start_pos), placeholder),
        end: format_timestamp(calibration.seconds_opt(timing.end_pos), placeholder),
        late_start: timing.late_start,
        early_end: timing.early_end,
        resolved_words: timing.resolved_words(),
        total_words: timing.entries.len(),
        notes,
    }
}

fn aggregate(
    sentences: &[SentenceTiming],
    gaps: &[BoundaryGap],
    diagnostics: &[Diagnostic],
) -> AggregateReport {
    let resolved = sentences.iter().filter(|s| s.is_resolved()).count();
    let words_total: usize = sentences.iter().map(|s| s.entries.len()).sum();
    let words_resolved: usize = sentences.iter().map(SentenceTiming::resolved_words).sum();
    let sides_left_unresolved = gaps
        .iter()
        .map(|gap| match gap.outcome {
            GapOutcome::Distributed { previous, next, .. } => [previous, next]
                .into_iter()
                .filter(|side| *side == SideResolution::LeftUnresolved)
                .count(),
            _ => 0,
        })
        .sum();
    let desync_count = diagnostics
        .iter()
        .filter(|d| matches!(d, Diagnostic::Desync { .. }))
        .count();

    AggregateReport {
        sentences_total: to_u32(sentences.len()),
        sentences_resolved: to_u32(resolved),
        sentences_unknown: to_u32(sentences.len() - resolved),
        boundaries_with_gaps: to_u32(gaps.len()),
        gaps_distributed: to_u32(gaps.iter().filter(|g| g.outcome.is_distributed()).count()),
        sides_left_unresolved: to_u32(sides_left_unresolved),
        desync_count: to_u32(desync_count),
        words_total: to_u32(words_total),
        words_resolved: to_u32(words_resolved),
        word_coverage_ratio: if words_total == 0 {
            0.0
        } else {
            words_resolved as f64 / words_total as f64
        },
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AlignmentEntry, RecognizedToken};

    fn run_info() -> RunInfo {
        RunInfo {
            generated_at: "2026-01-01T00:00:00Z".to_string(),
            script_path: "script.txt".to_string(),
            tokens_path: "tokens.json".to_string(),
            strategy: "global".to_string(),
            anchored: false,
        }
    }

    fn timing(
        index: usize,
        tokens: &[Option<usize>],
        start: Option<f64>,
        end: Option<f64>,
    ) -> SentenceTiming {
        SentenceTiming {
            index,
            text: format!("Sentence {index}."),
            entries: tokens
                .iter()
                .map(|&token| AlignmentEntry {
                    word: "w".to_string(),
                    token,
                })
                .collect(),
            start_pos: start,
            end_pos: end,
            late_start: 0,
            early_end: 0,
        }
    }

    fn output() -> AlignmentOutput {
        AlignmentOutput {
            sentences: vec![
                timing(1, &[Some(0), Some(1)], Some(0.0), Some(150.0)),
                timing(2, &[None, None], None, None),
            ],
            gaps: vec![BoundaryGap {
                previous: 0,
                next: 1,
                outcome: GapOutcome::Distributed {
                    missing_end: 0,
                    missing_start: 2,
                    ratio: 0.0,
                    unclaimed_start: 2,
                    unclaimed_end: 2,
                    previous: SideResolution::NotMissing,
                    next: SideResolution::LeftUnresolved,
                },
            }],
            recognized: vec![
                RecognizedToken::new("a", 0.0, 50.0),
                RecognizedToken::new("b", 100.0, 150.0),
            ],
        }
    }

    #[test]
    fn report_counts_resolution_and_coverage() {
        let diagnostics = vec![Diagnostic::Desync {
            sentence: 1,
            word_index: 0,
            expected: None,
            found: Some("x".to_string()),
        }];
        let report = build_report(
            run_info(),
            &output(),
            &Calibration::default(),
            "???",
            &diagnostics,
        );

        assert_eq!(report.schema_version, SCHEMA_VERSION);
        assert_eq!(report.aggregates.sentences_total, 2);
        assert_eq!(report.aggregates.sentences_resolved, 1);
        assert_eq!(report.aggregates.sentences_unknown, 1);
        assert_eq!(report.aggregates.gaps_distributed, 1);
        assert_eq!(report.aggregates.sides_left_unresolved, 1);
        assert_eq!(report.aggregates.desync_count, 1);
        assert!((report.aggregates.word_coverage_ratio - 0.5).abs() < 1e-12);
        assert_eq!(report.gaps[0].previous, 1);
        assert_eq!(report.gaps[0].next, 2);
    }

    #[test]
    fn sentence_entries_carry_timestamps_and_notes() {
        let report = build_report(run_info(), &output(), &Calibration::default(), "???", &[]);
        assert_eq!(report.sentences[0].start, "00:00:00,000");
        assert_eq!(report.sentences[0].end, "00:00:01,500");
        assert!(report.sentences[0].notes.is_empty());
        assert_eq!(report.sentences[1].start, "???");
        assert_eq!(report.sentences[1].notes, ["unknown"]);
    }

    #[test]
    fn unknown_timestamps_use_the_given_placeholder() {
        let report = build_report(run_info(), &output(), &Calibration::default(), "--:--", &[]);
        assert_eq!(report.sentences[0].start, "00:00:00,000");
        assert_eq!(report.sentences[1].start, "--:--");
        assert_eq!(report.sentences[1].end, "--:--");
    }

    #[test]
    fn report_serializes_flattened_meta() {
        let report = build_report(run_info(), &output(), &Calibration::default(), "???", &[]);
        let json = serde_json::to_value(&report).expect("serialize report");
        assert_eq!(json["meta"]["strategy"], "global");
        assert_eq!(json["meta"]["frame_rate"], 100.0);
        assert_eq!(json["gaps"][0]["outcome"]["kind"], "distributed");
        assert_eq!(json["gaps"][0]["outcome"]["next"]["status"], "left_unresolved");
    }
}
