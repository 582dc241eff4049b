use super::error::DocumentError;

#[derive(Debug, Clone)]
pub struct SplitterConfig {
    /// Window length in words.
    pub window_size: usize,
    /// Words shared between consecutive windows.
    pub overlap: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            window_size: 1000,
            overlap: 200,
        }
    }
}

impl SplitterConfig {
    /// Reject configurations that cannot make progress.
    ///
    /// # Errors
    ///
    /// Returns an error when `overlap >= window_size` or `window_size == 0`;
    /// either would stall the sliding window.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.window_size == 0 || self.overlap >= self.window_size {
            return Err(DocumentError::InvalidChunking {
                window_size: self.window_size,
                overlap: self.overlap,
            });
        }
        Ok(())
    }
}

/// Splits text into overlapping word windows.
///
/// The overlap carries context across chunk boundaries for embedding
/// quality, at the cost of `overlap / window_size` storage redundancy.
pub struct WordSplitter {
    config: SplitterConfig,
}

impl WordSplitter {
    /// # Errors
    ///
    /// Returns an error if the configuration is rejected by
    /// [`SplitterConfig::validate`].
    pub fn new(config: SplitterConfig) -> Result<Self, DocumentError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Produce the chunk sequence for `text`.
    ///
    /// Words are whitespace-delimited; each window is rejoined with single
    /// spaces. The last window may be shorter than `window_size`. Empty
    /// input yields no chunks; input shorter than one window yields exactly
    /// one chunk.
    #[must_use]
    pub fn split(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }

        let step = self.config.window_size - self.config.overlap;
        let mut chunks = Vec::new();
        let mut start = 0;
        while start < words.len() {
            let end = (start + self.config.window_size).min(words.len());
            chunks.push(words[start..end].join(" "));
            start += step;
        }
        chunks
    }
}
