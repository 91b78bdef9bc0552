//! Cosine similarity helpers
//!
//! Zero vectors have no direction; any similarity involving one is 0.0.

/// Scale a vector to unit length in place (zero vectors are left alone)
pub fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Cosine similarity in [-1, 1]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Highest similarity of `query` against a set; 0.0 for an empty set
pub fn max_similarity(query: &[f32], set: &[Vec<f32>]) -> f32 {
    set.iter()
        .map(|v| cosine_similarity(query, v))
        .fold(None, |best: Option<f32>, s| Some(best.map_or(s, |b| b.max(s))))
        .unwrap_or(0.0)
}

/// Mean similarity of `query` against a set; 0.0 for an empty set
pub fn mean_similarity(query: &[f32], set: &[Vec<f32>]) -> f32 {
    if set.is_empty() {
        return 0.0;
    }
    let total: f32 = set.iter().map(|v| cosine_similarity(query, v)).sum();
    total / set.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_basic() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-2.0, 0.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_and_mismatched() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_max_and_mean() {
        let set = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, 0.0]];
        let q = [1.0, 0.0];
        assert!((max_similarity(&q, &set) - 1.0).abs() < 1e-6);
        assert!(mean_similarity(&q, &set).abs() < 1e-6);

        // all-negative sets keep their sign
        let set = vec![vec![-1.0, 0.0]];
        assert!((max_similarity(&q, &set) + 1.0).abs() < 1e-6);

        assert_eq!(max_similarity(&q, &[]), 0.0);
        assert_eq!(mean_similarity(&q, &[]), 0.0);
    }

    #[test]
    fn test_normalize() {
        let mut v = vec![3.0, 4.0];
        normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);

        let mut zero = vec![0.0, 0.0];
        normalize(&mut zero);
        assert_eq!(zero, vec![0.0, 0.0]);
    }
}
