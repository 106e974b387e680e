use crate::config::ScoreMode;

const DISTRIBUTION_TOLERANCE: f32 = 1e-3;

pub fn apply_score_mode(scores: Vec<f32>, mode: ScoreMode) -> Vec<f32> {
    match mode {
        ScoreMode::Raw => scores,
        ScoreMode::Softmax => softmax(&scores),
    }
}

pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|score| (score - max).exp()).collect();
    let sum: f32 = exps.iter().sum();

    exps.into_iter().map(|value| value / sum).collect()
}

/// True when the scores already look like probabilities.
pub fn is_distribution(scores: &[f32]) -> bool {
    let in_range = scores
        .iter()
        .all(|score| (-DISTRIBUTION_TOLERANCE..=1.0 + DISTRIBUTION_TOLERANCE).contains(score));
    let sum: f32 = scores.iter().sum();

    in_range && (sum - 1.0).abs() <= DISTRIBUTION_TOLERANCE * scores.len().max(1) as f32
}

/// Indices of the `k` highest scores, best first. Ties keep the lower index first;
/// NaN ranks below every number.
pub fn top_k(scores: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| rank_key(b.1).total_cmp(&rank_key(a.1)));
    ranked.truncate(k);
    ranked
}

fn rank_key(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}
