use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::PipelineError;

/// Write `rows` as one flat JSON array, replacing whatever is at `path`.
pub fn write_records<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), PipelineError> {
    let export_err = |reason: String| PipelineError::Export {
        path: path.to_path_buf(),
        reason,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| export_err(e.to_string()))?;
    }
    let file = File::create(path).map_err(|e| export_err(e.to_string()))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer(&mut w, rows).map_err(|e| export_err(e.to_string()))?;
    w.flush().map_err(|e| export_err(e.to_string()))?;
    info!(path = %path.display(), rows = rows.len(), "Exported");
    Ok(())
}
