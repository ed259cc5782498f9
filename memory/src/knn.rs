use crate::embedding::dot;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredIdx {
    pub idx: usize,
    pub score: f32,
}

/// Return the `top_k` haystack positions ranked by dot product with `query`,
/// highest first. Equal scores keep haystack order.
pub fn top_k_dot<V: AsRef<[f32]>>(haystack: &[V], query: &[f32], top_k: usize) -> Vec<ScoredIdx> {
    if top_k == 0 || haystack.is_empty() { return Vec::new(); }
    let mut scored: Vec<ScoredIdx> = haystack
        .iter()
        .enumerate()
        .map(|(idx, v)| ScoredIdx { idx, score: dot(v.as_ref(), query) })
        .collect();
    // `sort_by` is stable, which gives the insertion-order tie break.
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topk_basic() {
        let hay = vec![
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![0.7, 0.3],
        ];
        let res = top_k_dot(&hay, &[1.0, 0.0], 2);
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].idx, 1);
        assert_eq!(res[1].idx, 2);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let hay = vec![vec![0.5, 0.5], vec![1.0, 0.0], vec![0.5, 0.5]];
        let res = top_k_dot(&hay, &[1.0, 1.0], 3);
        let idxs: Vec<_> = res.iter().map(|s| s.idx).collect();
        assert_eq!(idxs, vec![0, 1, 2]);
    }

    #[test]
    fn zero_k_or_empty_haystack() {
        let empty: Vec<Vec<f32>> = Vec::new();
        assert!(top_k_dot(&empty, &[1.0], 3).is_empty());
        assert!(top_k_dot(&[vec![1.0]], &[1.0], 0).is_empty());
    }
}
