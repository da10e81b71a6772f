use serde::{Deserialize, Serialize};

/// Spacing of the target coordinates of a range selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RangeMode {
    #[default]
    Linear,
    Log,
}

/// `steps` target coordinates from `from` to `to`, both ends included.
///
/// Returns `None` when `steps < 2`, or in log mode when either bound is not
/// strictly positive.
pub fn targets(from: f64, to: f64, steps: usize, mode: RangeMode) -> Option<Vec<f64>> {
    if steps < 2 {
        return None;
    }
    let last = (steps - 1) as f64;
    match mode {
        RangeMode::Linear => {
            let step = (to - from) / last;
            Some((0..steps).map(|i| from + i as f64 * step).collect())
        }
        RangeMode::Log => {
            if from <= 0.0 || to <= 0.0 {
                return None;
            }
            let ratio = (to / from).ln() / last;
            Some((0..steps).map(|i| from * (i as f64 * ratio).exp()).collect())
        }
    }
}

/// Index of the label closest to `target`; ties go to the earliest label.
/// Labels at a non-finite distance (NaN or infinite) are never chosen.
pub fn nearest_index(labels: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &label) in labels.iter().enumerate() {
        let distance = (label - target).abs();
        if !distance.is_finite() {
            continue;
        }
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}

/// Map each target of the range onto the nearest label index.
///
/// One index per target, in target order; the same index may repeat when
/// targets are denser than the labels.
pub fn select(
    labels: &[f64],
    from: f64,
    to: f64,
    steps: usize,
    mode: RangeMode,
) -> Option<Vec<usize>> {
    if labels.is_empty() {
        return None;
    }
    targets(from, to, steps, mode)?
        .into_iter()
        .map(|t| nearest_index(labels, t))
        .collect()
}
