//! Writes export artifacts to disk

use anyhow::{Context, Result};
use gridline::engine::ExportArtifact;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Write `artifact` into `dir` under its own file name, replacing any file
/// already there.
pub fn write_artifact(artifact: &ExportArtifact, dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let path = dir.join(&artifact.file_name);
    fs::write(&path, &artifact.contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        "Exported {} ({}, {} bytes)",
        path.display(),
        artifact.mime_type,
        artifact.contents.len()
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_artifact() {
        let dir = std::env::temp_dir().join(format!("gridline-export-{}", std::process::id()));
        let artifact = ExportArtifact {
            file_name: "runs.csv".to_string(),
            mime_type: "text/csv;charset=utf-8",
            contents: "Name\nalpha".to_string(),
        };

        let path = write_artifact(&artifact, &dir).unwrap();
        assert_eq!(path, dir.join("runs.csv"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "Name\nalpha");

        let _ = fs::remove_dir_all(&dir);
    }
}
