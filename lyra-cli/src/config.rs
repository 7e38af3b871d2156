//! Environment-driven configuration.
//!
//! All knobs come from the environment (a `.env` file is honored when
//! present). The API key is the one setting with no usable default, so it
//! fails fast at startup instead of surfacing as an authorization error
//! mid-run.

use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_MODEL: &str = "gpt-4.1-mini";
const DEFAULT_EMBED_MODEL: &str = "text-embedding-3-small";
const DEFAULT_EMBED_DIMENSIONS: usize = 1536;
const DEFAULT_PERSIST_DIR: &str = "data/index_storage";
const DEFAULT_CORPUS_PATH: &str = "data/corpus/beatles_lyrics.txt";

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI API key. Required.
    pub api_key: String,
    /// Generation model identifier (`MODEL_NAME`).
    pub model: String,
    /// Embedding model identifier (`EMBED_MODEL`).
    pub embed_model: String,
    /// Embedding dimensionality (`EMBED_DIMENSIONS`).
    pub embed_dimensions: usize,
    /// Directory the index is persisted under (`INDEX_PERSIST_DIR`).
    pub persist_dir: PathBuf,
    /// Path to the corpus file (`CORPUS_PATH`).
    pub corpus_path: PathBuf,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty()).unwrap_or_else(|| default.into())
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// # Errors
    ///
    /// Fails when `OPENAI_API_KEY` is unset or empty, or when
    /// `EMBED_DIMENSIONS` is set but not a positive integer.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .context("OPENAI_API_KEY is not set; export it or add it to .env")?;

        let embed_dimensions = match std::env::var("EMBED_DIMENSIONS") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&d| d > 0)
                .with_context(|| format!("EMBED_DIMENSIONS must be a positive integer, got {raw:?}"))?,
            Err(_) => DEFAULT_EMBED_DIMENSIONS,
        };

        Ok(Self {
            api_key,
            model: env_or("MODEL_NAME", DEFAULT_MODEL),
            embed_model: env_or("EMBED_MODEL", DEFAULT_EMBED_MODEL),
            embed_dimensions,
            persist_dir: PathBuf::from(env_or("INDEX_PERSIST_DIR", DEFAULT_PERSIST_DIR)),
            corpus_path: PathBuf::from(env_or("CORPUS_PATH", DEFAULT_CORPUS_PATH)),
        })
    }
}
