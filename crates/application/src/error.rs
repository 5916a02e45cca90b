use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ReadingTimeError {
    #[error("post does not exist: {0}")]
    PostNotFound(PathBuf),
    #[error("not a supported post file: {0}")]
    UnsupportedPost(PathBuf),
    #[error("failed to read {path}: {reason}")]
    Read { path: PathBuf, reason: String },
    #[error("failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },
    #[error("malformed data in {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
    #[error("invalid reading time override `{0}`: expected a whole number of minutes up to 999")]
    InvalidOverride(String),
    #[error("invalid setting `{key}`: {reason}")]
    InvalidSetting { key: String, reason: String },
    #[error("file watcher error for {path}: {reason}")]
    Watch { path: PathBuf, reason: String },
}
