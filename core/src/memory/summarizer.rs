/// Interface for producing a short textual summary from a set of snippets.
///
/// Implementations should be resilient and return `None` when no summary can
/// be produced.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, texts: &[String]) -> Option<String>;
}

/// Joins snippets with single spaces and cuts the result to `max_chars`
/// characters at the last space, marking the cut with `...`.
#[derive(Debug, Clone, Copy)]
pub struct TruncatingSummarizer {
    pub max_chars: usize,
}

impl TruncatingSummarizer {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Default for TruncatingSummarizer {
    fn default() -> Self {
        Self { max_chars: 400 }
    }
}

impl Summarizer for TruncatingSummarizer {
    fn summarize(&self, texts: &[String]) -> Option<String> {
        let joined = texts.join(" ");
        if joined.chars().count() <= self.max_chars {
            return Some(joined);
        }
        let head: String = joined.chars().take(self.max_chars).collect();
        // With no space in the head the whole head is kept.
        let cut = match head.rfind(' ') {
            Some(idx) => &head[..idx],
            None => head.as_str(),
        };
        Some(format!("{cut}..."))
    }
}
