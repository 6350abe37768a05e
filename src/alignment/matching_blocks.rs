use std::collections::HashMap;

use crate::types::AlignmentStep;

/// A run of `len` equal tokens starting at `script` and `recognized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingBlock {
    pub script: usize,
    pub recognized: usize,
    pub len: usize,
}

/// Maximal matching blocks, ordered and non-crossing, with adjacent blocks
/// merged. Same recursion as difflib's `SequenceMatcher` without junk
/// heuristics.
pub fn matching_blocks(script: &[&str], recognized: &[&str]) -> Vec<MatchingBlock> {
    let mut positions: HashMap<&str, Vec<usize>> = HashMap::new();
    for (j, &token) in recognized.iter().enumerate() {
        positions.entry(token).or_default().push(j);
    }

    let mut queue = vec![(0, script.len(), 0, recognized.len())];
    let mut blocks = Vec::new();
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let block = longest_match(script, &positions, alo, ahi, blo, bhi);
        if block.len == 0 {
            continue;
        }
        blocks.push(block);
        if alo < block.script && blo < block.recognized {
            queue.push((alo, block.script, blo, block.recognized));
        }
        let a_end = block.script + block.len;
        let b_end = block.recognized + block.len;
        if a_end < ahi && b_end < bhi {
            queue.push((a_end, ahi, b_end, bhi));
        }
    }
    blocks.sort_by_key(|b| (b.script, b.recognized));

    let mut merged: Vec<MatchingBlock> = Vec::with_capacity(blocks.len());
    for block in blocks {
        match merged.last_mut() {
            Some(last)
                if last.script + last.len == block.script
                    && last.recognized + last.len == block.recognized =>
            {
                last.len += block.len;
            }
            _ => merged.push(block),
        }
    }
    merged
}

/// Longest run of equal tokens inside `script[alo..ahi]` and
/// `recognized[blo..bhi]`; earliest in `script`, then in `recognized`, on ties.
fn longest_match(
    script: &[&str],
    positions: &HashMap<&str, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> MatchingBlock {
    let mut best = MatchingBlock {
        script: alo,
        recognized: blo,
        len: 0,
    };
    // run_len[j] = length of the run of equal tokens ending at (i - 1, j).
    let mut run_len: HashMap<usize, usize> = HashMap::new();
    for (i, word) in script.iter().enumerate().take(ahi).skip(alo) {
        let mut next_run_len = HashMap::new();
        if let Some(js) = positions.get(*word) {
            for &j in js {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| run_len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_run_len.insert(j, k);
                if k > best.len {
                    best = MatchingBlock {
                        script: i + 1 - k,
                        recognized: j + 1 - k,
                        len: k,
                    };
                }
            }
        }
        run_len = next_run_len;
    }
    best
}

/// Turns matching blocks into alignment steps. Tokens between two blocks are
/// emitted as script-only first, then recognized-only; no order is claimed
/// between the two sides of such a gap.
pub fn align_matching_blocks(script: &[&str], recognized: &[&str]) -> Vec<AlignmentStep> {
    let mut steps = Vec::with_capacity(script.len() + recognized.len());
    let mut a = 0usize;
    let mut b = 0usize;

    let tail = MatchingBlock {
        script: script.len(),
        recognized: recognized.len(),
        len: 0,
    };
    for block in matching_blocks(script, recognized)
        .into_iter()
        .chain(std::iter::once(tail))
    {
        steps.extend((a..block.script).map(AlignmentStep::ScriptOnly));
        steps.extend((b..block.recognized).map(AlignmentStep::RecognizedOnly));
        steps.extend((0..block.len).map(|k| AlignmentStep::Match {
            script: block.script + k,
            recognized: block.recognized + k,
        }));
        a = block.script + block.len;
        b = block.recognized + block.len;
    }

    tracing::debug!(
        script_len = script.len(),
        recognized_len = recognized.len(),
        "matching_blocks: alignment complete"
    );
    steps
}
