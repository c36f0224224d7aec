//! Chunked ingestion for output that arrives in arbitrary pieces.

use crate::aggregator::LogAggregator;

/// Buffers a partial trailing line between output chunks.
///
/// Process output events do not respect line boundaries; a record split
/// across two chunks would otherwise be skipped as malformed twice.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk, parsing every line it completes. Returns recognized count.
    pub fn push(&mut self, aggregator: &mut LogAggregator, chunk: &str) -> usize {
        self.pending.push_str(chunk);

        let Some(last_newline) = self.pending.rfind('\n') else {
            return 0;
        };

        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);

        complete
            .split('\n')
            .filter(|line| aggregator.parse_line(line))
            .count()
    }

    /// Parse whatever is left once the stream has ended.
    pub fn finish(&mut self, aggregator: &mut LogAggregator) -> usize {
        let rest = std::mem::take(&mut self.pending);
        usize::from(aggregator.parse_line(&rest))
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }
}
