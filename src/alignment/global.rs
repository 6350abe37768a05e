use crate::config::AlignerConfig;
use crate::error::AlignmentError;
use crate::types::AlignmentStep;

const NEG: i64 = i64::MIN / 4;

const STATE_MATCH: u8 = 0;
const STATE_SCRIPT_ONLY: u8 = 1;
const STATE_RECOGNIZED_ONLY: u8 = 2;

/// Number of DP cells needed to align `script_len` against `recognized_len`.
pub(crate) fn grid_cells(script_len: usize, recognized_len: usize) -> Option<usize> {
    (script_len + 1).checked_mul(recognized_len + 1)
}

/// Affine-gap global alignment without a substitution move.
///
/// Two different words are never paired: every step is a match, a script-only
/// word or a recognized-only token. Opening a gap costs `gap_open`, each
/// further token of the same gap costs `gap_extend`. Ties prefer match, then
/// script-only, then recognized-only.
pub fn align_global(
    script: &[&str],
    recognized: &[&str],
    config: &AlignerConfig,
) -> Result<Vec<AlignmentStep>, AlignmentError> {
    let n = script.len();
    let m = recognized.len();
    let cells = grid_cells(n, m)
        .filter(|&cells| cells <= config.max_global_cells)
        .ok_or_else(|| {
            AlignmentError::invalid_input(format!(
                "global alignment grid {}x{} exceeds max_global_cells={}; use the matching-block strategy",
                n + 1,
                m + 1,
                config.max_global_cells
            ))
        })?;

    let match_score = config.match_score as i64;
    let open = config.gap_open as i64;
    let extend = config.gap_extend as i64;
    let width = m + 1;

    // Packed predecessor states: bits 0-1 for M, 2-3 for X, 4-5 for Y.
    let mut bp = vec![0u8; cells];

    let mut prev_m = vec![NEG; width];
    let mut prev_x = vec![NEG; width];
    let mut prev_y = vec![NEG; width];
    let mut curr_m = vec![NEG; width];
    let mut curr_x = vec![NEG; width];
    let mut curr_y = vec![NEG; width];

    prev_m[0] = 0;
    for j in 1..width {
        let (y, y_from) = best3(
            prev_m[j - 1] + open,
            prev_x[j - 1] + open,
            prev_y[j - 1] + extend,
        );
        prev_y[j] = y;
        bp[j] = y_from << 4;
    }

    for i in 1..=n {
        let row = i * width;
        let word = script[i - 1];

        curr_m[0] = NEG;
        curr_y[0] = NEG;
        let (x, x_from) = best3(prev_m[0] + open, prev_x[0] + extend, prev_y[0] + open);
        curr_x[0] = x;
        bp[row] = x_from << 2;

        for j in 1..width {
            let (m_score, m_from) = if word == recognized[j - 1] {
                let (best, from) = best3(prev_m[j - 1], prev_x[j - 1], prev_y[j - 1]);
                (best + match_score, from)
            } else {
                (NEG, STATE_MATCH)
            };
            let (x_score, x_from) = best3(prev_m[j] + open, prev_x[j] + extend, prev_y[j] + open);
            let (y_score, y_from) = best3(
                curr_m[j - 1] + open,
                curr_x[j - 1] + open,
                curr_y[j - 1] + extend,
            );
            curr_m[j] = m_score;
            curr_x[j] = x_score;
            curr_y[j] = y_score;
            bp[row + j] = m_from | (x_from << 2) | (y_from << 4);
        }

        std::mem::swap(&mut prev_m, &mut curr_m);
        std::mem::swap(&mut prev_x, &mut curr_x);
        std::mem::swap(&mut prev_y, &mut curr_y);
    }

    let (_, mut state) = best3(prev_m[m], prev_x[m], prev_y[m]);
    let (mut i, mut j) = (n, m);
    let mut steps = Vec::with_capacity(n + m);
    while i > 0 || j > 0 {
        let packed = bp[i * width + j];
        let from = (packed >> (2 * state)) & 0b11;
        match state {
            STATE_MATCH => {
                steps.push(AlignmentStep::Match {
                    script: i - 1,
                    recognized: j - 1,
                });
                i -= 1;
                j -= 1;
            }
            STATE_SCRIPT_ONLY => {
                steps.push(AlignmentStep::ScriptOnly(i - 1));
                i -= 1;
            }
            _ => {
                steps.push(AlignmentStep::RecognizedOnly(j - 1));
                j -= 1;
            }
        }
        state = from;
    }
    steps.reverse();

    tracing::debug!(
        script_len = n,
        recognized_len = m,
        matched = steps
            .iter()
            .filter(|s| matches!(s, AlignmentStep::Match { .. }))
            .count(),
        "global: alignment complete"
    );
    Ok(steps)
}

#[inline(always)]
fn best3(from_m: i64, from_x: i64, from_y: i64) -> (i64, u8) {
    let mut best = from_m;
    let mut state = STATE_MATCH;
    if from_x > best {
        best = from_x;
        state = STATE_SCRIPT_ONLY;
    }
    if from_y > best {
        best = from_y;
        state = STATE_RECOGNIZED_ONLY;
    }
    (best, state)
}
