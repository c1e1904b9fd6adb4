use async_trait::async_trait;

/// Web lookup used for search commands and unanswered questions.
///
/// Implementations never fail: every problem is turned into a sentence the
/// user can read.
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Provider name, for logging
    fn name(&self) -> &str;

    /// Look up `query` and return a display string
    async fn search(&self, query: &str) -> String;
}
