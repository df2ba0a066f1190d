//! Whole-collection snapshot of the popular listings.
//!
//! The snapshot is trusted as-is: nothing compares it against the raw pages,
//! so a cache built from older pages keeps being served until it is removed.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::error::PipelineError;
use crate::records::RawListing;

/// Where the intermediate dataset came from on this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Built,
}

/// Load the snapshot at `path`, or run `build` and persist its result there.
pub fn load_or_build<F>(path: &Path, build: F) -> Result<(Vec<RawListing>, CacheOutcome), PipelineError>
where
    F: FnOnce() -> Result<Vec<RawListing>, PipelineError>,
{
    if path.exists() {
        let listings = load(path)?;
        info!(path = %path.display(), listings = listings.len(), "Loaded intermediate cache");
        return Ok((listings, CacheOutcome::Hit));
    }
    info!(path = %path.display(), "No intermediate cache, scanning raw pages");
    let listings = build()?;
    save(path, &listings)?;
    Ok((listings, CacheOutcome::Built))
}

pub fn load(path: &Path) -> Result<Vec<RawListing>, PipelineError> {
    let load_err = |reason: String| PipelineError::CacheLoad {
        path: path.to_path_buf(),
        reason,
    };
    let file = File::open(path).map_err(|e| load_err(e.to_string()))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| load_err(e.to_string()))
}

/// Write via a sibling temp file and rename, so a crash never leaves a
/// truncated snapshot behind.
pub fn save(path: &Path, listings: &[RawListing]) -> Result<(), PipelineError> {
    let write_err = |reason: String| PipelineError::CacheWrite {
        path: path.to_path_buf(),
        reason,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
    }
    let tmp = path.with_extension("tmp");
    {
        let file = File::create(&tmp).map_err(|e| write_err(e.to_string()))?;
        let mut w = BufWriter::new(file);
        serde_json::to_writer(&mut w, listings).map_err(|e| write_err(e.to_string()))?;
        w.flush().map_err(|e| write_err(e.to_string()))?;
    }
    fs::rename(&tmp, path).map_err(|e| write_err(e.to_string()))?;
    info!(path = %path.display(), listings = listings.len(), "Saved intermediate cache");
    Ok(())
}

/// Remove the snapshot. Returns whether one existed.
pub fn clear(path: &Path) -> Result<bool, PipelineError> {
    match fs::remove_file(path) {
        Ok(()) => {
            info!(path = %path.display(), "Removed intermediate cache");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not remove intermediate cache");
            Err(e.into())
        }
    }
}
