use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a pipeline run.
///
/// A missing ban list is not represented here: it degrades to an empty list.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("listing file #{index} ({path}) could not be read: {reason}")]
    SourceRead {
        index: usize,
        path: PathBuf,
        reason: String,
    },
    #[error("intermediate cache {path} is present but unreadable: {reason} (delete it to rebuild)")]
    CacheLoad { path: PathBuf, reason: String },
    #[error("failed to write intermediate cache {path}: {reason}")]
    CacheWrite { path: PathBuf, reason: String },
    #[error("category reference file {path} could not be loaded: {reason}")]
    CategoryLoad { path: PathBuf, reason: String },
    #[error("cannot sample {requested} items: only {available} available")]
    SampleSize { requested: usize, available: usize },
    #[error("failed to export {path}: {reason}")]
    Export { path: PathBuf, reason: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}
