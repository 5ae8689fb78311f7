/// A text embedding model loaded once and shared across callers.
///
/// Implementations must be deterministic: the same input text always yields
/// the same vector of length `dim()`.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}
