use serde::Serialize;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::types::RemappedSentence;

/// What happened to one side of a sentence boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SideResolution {
    /// The boundary word already had a token.
    NotMissing,
    Resolved { token: usize },
    /// The boundary word was missing but no token was left for it.
    LeftUnresolved,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GapOutcome {
    NoGap,
    NoUnclaimedTokens {
        missing_end: usize,
        missing_start: usize,
    },
    Distributed {
        missing_end: usize,
        missing_start: usize,
        ratio: f64,
        /// Unclaimed recognized tokens, `start..end`.
        unclaimed_start: usize,
        unclaimed_end: usize,
        previous: SideResolution,
        next: SideResolution,
    },
}

impl GapOutcome {
    pub fn left_unresolved(&self) -> bool {
        matches!(
            self,
            Self::Distributed {
                previous: SideResolution::LeftUnresolved,
                ..
            } | Self::Distributed {
                next: SideResolution::LeftUnresolved,
                ..
            }
        )
    }

    pub fn is_distributed(&self) -> bool {
        matches!(self, Self::Distributed { .. })
    }
}

/// Outcome of gap distribution across the boundary between two sentences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryGap {
    pub previous: usize,
    pub next: usize,
    pub outcome: GapOutcome,
}

/// Hands unclaimed recognized tokens to the unresolved words that sit right at
/// sentence boundaries.
///
/// For each pair of adjacent sentences with words, the tokens strictly between
/// the last claim at or before `previous` and the first claim at or after
/// `next` are split in proportion to how many words are missing on each side.
/// At most the last word of `previous` and the first word of `next` receive a
/// token; interior gaps stay unresolved. Claims stay monotone, so no token is
/// handed out twice.
pub fn distribute_gaps(
    mut sentences: Vec<RemappedSentence>,
    token_count: usize,
    diagnostics: &mut Diagnostics,
) -> (Vec<RemappedSentence>, Vec<BoundaryGap>) {
    let mut first_claimed_from = vec![None; sentences.len() + 1];
    for k in (0..sentences.len()).rev() {
        first_claimed_from[k] = sentences[k].first_claimed().or(first_claimed_from[k + 1]);
    }

    let active: Vec<usize> = (0..sentences.len())
        .filter(|&k| !sentences[k].entries.is_empty())
        .collect();

    let mut gaps = Vec::with_capacity(active.len().saturating_sub(1));
    let mut claimed_before: Option<usize> = None;
    for pair in active.windows(2) {
        let (previous, next) = (pair[0], pair[1]);
        let left = sentences[previous].last_claimed().or(claimed_before);
        let right = sentences[next]
            .first_claimed()
            .or(first_claimed_from[next + 1]);
        let unclaimed_start = left.map_or(0, |t| t + 1);
        let unclaimed_end = right.unwrap_or(token_count);

        let outcome = split_gap(
            &mut sentences,
            previous,
            next,
            unclaimed_start,
            unclaimed_end,
        );
        if outcome != GapOutcome::NoGap {
            tracing::debug!(previous, next, ?outcome, "gaps: boundary processed");
        }

        claimed_before = sentences[previous].last_claimed().or(claimed_before);
        let gap = BoundaryGap {
            previous,
            next,
            outcome,
        };
        if gap.outcome != GapOutcome::NoGap {
            diagnostics.record(Diagnostic::Gap(gap.clone()));
        }
        gaps.push(gap);
    }

    (sentences, gaps)
}

fn split_gap(
    sentences: &mut [RemappedSentence],
    previous: usize,
    next: usize,
    unclaimed_start: usize,
    unclaimed_end: usize,
) -> GapOutcome {
    let missing_end = sentences[previous].trailing_unresolved();
    let missing_start = sentences[next].leading_unresolved();
    if missing_end + missing_start == 0 {
        return GapOutcome::NoGap;
    }

    let count = unclaimed_end.saturating_sub(unclaimed_start);
    if count == 0 {
        return GapOutcome::NoUnclaimedTokens {
            missing_end,
            missing_start,
        };
    }

    let ratio = missing_end as f64 / (missing_end + missing_start) as f64;
    let (previous_side, next_side) = if missing_end == 0 {
        let token = unclaimed_start;
        assign_first(&mut sentences[next], token);
        (
            SideResolution::NotMissing,
            SideResolution::Resolved { token },
        )
    } else if missing_start == 0 {
        let token = unclaimed_end - 1;
        assign_last(&mut sentences[previous], token);
        (
            SideResolution::Resolved { token },
            SideResolution::NotMissing,
        )
    } else {
        let offset = ((ratio * count as f64).round_ties_even() as usize).min(count - 1);
        let previous_token = unclaimed_start + offset;
        assign_last(&mut sentences[previous], previous_token);
        let next_side = if offset + 1 < count {
            let token = previous_token + 1;
            assign_first(&mut sentences[next], token);
            SideResolution::Resolved { token }
        } else {
            SideResolution::LeftUnresolved
        };
        (
            SideResolution::Resolved {
                token: previous_token,
            },
            next_side,
        )
    };

    GapOutcome::Distributed {
        missing_end,
        missing_start,
        ratio,
        unclaimed_start,
        unclaimed_end,
        previous: previous_side,
        next: next_side,
    }
}

fn assign_first(sentence: &mut RemappedSentence, token: usize) {
    if let Some(entry) = sentence.entries.first_mut() {
        entry.token = Some(token);
    }
}

fn assign_last(sentence: &mut RemappedSentence, token: usize) {
    if let Some(entry) = sentence.entries.last_mut() {
        entry.token = Some(token);
    }
}
