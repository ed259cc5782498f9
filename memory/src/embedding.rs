/// Errors that can occur when producing embeddings.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("embedding dimension must be non-zero")]
    ZeroDimension,
}

/// Default dimension for hashed embeddings.
pub const DEFAULT_DIM: usize = 256;

/// 64-bit FNV-1a. Bucket assignment must not depend on a per-process seed,
/// otherwise stored vectors would stop lining up across runs.
pub fn fnv1a64(s: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325; // FNV offset basis
    for b in s.as_bytes() {
        hash ^= *b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Split `text` into lowercased maximal runs of `[A-Za-z0-9_]`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_ascii_lowercase())
        .collect()
}

/// Deterministic bag-of-words embedder: every token increments the bucket
/// `fnv1a64(token) % dim`, then the vector is L2-normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashedEmbedder {
    dim: usize,
}

impl HashedEmbedder {
    pub fn new(dim: usize) -> Result<Self, EmbeddingError> {
        if dim == 0 {
            return Err(EmbeddingError::ZeroDimension);
        }
        Ok(Self { dim })
    }

    /// Embed a single text. Text without tokens yields the zero vector.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; self.dim];
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return vec;
        }
        for tok in &tokens {
            let bucket = (fnv1a64(tok) % self.dim as u64) as usize;
            vec[bucket] += 1.0;
        }
        let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in vec.iter_mut() {
                *v /= norm;
            }
        }
        vec
    }
}

impl Default for HashedEmbedder {
    fn default() -> Self {
        Self { dim: DEFAULT_DIM }
    }
}

/// Dot product of two equal-length vectors. For L2-normalized inputs this is
/// the cosine similarity. Returns 0.0 when the lengths differ.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn norm(v: &[f32]) -> f32 {
        v.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    #[test]
    fn tokenize_splits_on_non_word_and_lowercases() {
        assert_eq!(
            tokenize("Self-Attention, GPT_4 & co."),
            vec!["self", "attention", "gpt_4", "co"]
        );
        assert!(tokenize("  --- !!").is_empty());
    }

    #[test]
    fn fnv1a64_matches_reference_values() {
        assert_eq!(fnv1a64(""), 0xcbf29ce484222325);
        assert_eq!(fnv1a64("a"), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn embed_has_requested_dim_and_unit_norm() {
        for dim in [1usize, 7, 64, 256] {
            let e = HashedEmbedder::new(dim).unwrap();
            let v = e.embed("Transformers use self attention; attention is all you need.");
            assert_eq!(v.len(), dim);
            assert!((norm(&v) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn embed_without_tokens_is_zero_vector() {
        let e = HashedEmbedder::new(32).unwrap();
        let v = e.embed("?!  ...");
        assert_eq!(v, vec![0.0; 32]);
    }

    #[test]
    fn embed_is_deterministic_and_case_insensitive() {
        let e = HashedEmbedder::default();
        assert_eq!(e.embed("Neural Networks"), e.embed("neural networks"));
    }

    #[test]
    fn zero_dim_is_rejected() {
        assert!(matches!(HashedEmbedder::new(0), Err(EmbeddingError::ZeroDimension)));
    }
}
