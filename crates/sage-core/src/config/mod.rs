mod env;
mod types;


pub use types::*;

use std::path::Path;

use anyhow::{Context, bail};

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Reject configurations that would misbehave at runtime.
    ///
    /// # Errors
    ///
    /// Returns an error when the chunk window cannot make progress
    /// (`overlap >= window_size`), or when a model name is empty.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.chunking.window_size == 0 {
            bail!("chunking.window_size must be positive");
        }
        if self.chunking.overlap >= self.chunking.window_size {
            bail!(
                "chunking.overlap ({}) must be smaller than chunking.window_size ({})",
                self.chunking.overlap,
                self.chunking.window_size
            );
        }
        if self.llm.model.is_empty() {
            bail!("llm.model must not be empty");
        }
        if self.llm.embedding_model.is_empty() {
            bail!("llm.embedding_model must not be empty");
        }
        Ok(())
    }
}
