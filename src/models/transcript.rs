//! Loading transcripts (a JSON array of messages) from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::ChatMessage;

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("failed to read transcript {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse transcript {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("message {index} in {path} has no content items")]
    EmptyMessage { path: PathBuf, index: usize },
}

/// Load a transcript file.
///
/// Messages without content would render as nothing, so they are rejected
/// here rather than silently skipped later.
pub fn load_transcript(path: &Path) -> Result<Vec<ChatMessage>, TranscriptError> {
    let content = fs::read_to_string(path).map_err(|source| TranscriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let messages = parse_transcript(&content).map_err(|source| TranscriptError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(index) = messages.iter().position(|m| m.types.is_empty()) {
        return Err(TranscriptError::EmptyMessage {
            path: path.to_path_buf(),
            index,
        });
    }

    tracing::debug!("Loaded {} messages from {}", messages.len(), path.display());
    Ok(messages)
}

fn parse_transcript(content: &str) -> Result<Vec<ChatMessage>, serde_json::Error> {
    serde_json::from_str(content)
}
