//! Set and vector measures shared by the strategies

use std::collections::{BTreeMap, BTreeSet};

/// Jaccard distance `1 - |A ∩ B| / |A ∪ B|`, 0 when both sets are empty
///
/// Returns `(distance, intersection_size, union_size)`.
pub fn jaccard_distance<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> (f64, usize, usize) {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return (0.0, 0, 0);
    }
    let similarity = intersection as f64 / union as f64;
    ((1.0 - similarity).clamp(0.0, 1.0), intersection, union)
}

/// Cosine similarity of two sparse non-negative vectors
///
/// Missing keys count as 0. Returns 0 when either vector has zero norm. The
/// result is clamped to [0, 1] to absorb rounding error.
pub fn cosine_similarity(a: &BTreeMap<&str, f64>, b: &BTreeMap<&str, f64>) -> f64 {
    let keys: BTreeSet<&str> = a.keys().chain(b.keys()).copied().collect();
    if keys.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for key in keys {
        let va = a.get(key).copied().unwrap_or(0.0);
        let vb = b.get(key).copied().unwrap_or(0.0);
        dot += va * vb;
        norm_a += va * va;
        norm_b += vb * vb;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}

/// Base-2 Shannon entropy of a frequency distribution
///
/// Non-positive counts are ignored. Returns 0 for an empty or all-zero
/// distribution.
pub fn shannon_entropy<'a>(counts: impl IntoIterator<Item = &'a f64>) -> f64 {
    let counts: Vec<f64> = counts.into_iter().copied().filter(|c| *c > 0.0).collect();
    let total: f64 = counts.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    let entropy: f64 = counts
        .iter()
        .map(|c| {
            let p = c / total;
            -p * p.log2()
        })
        .sum();
    entropy.max(0.0)
}
