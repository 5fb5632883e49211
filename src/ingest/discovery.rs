use std::fs;
use std::path::{Path, PathBuf};

use super::error::IngestError;

/// A DataPoints JSON file and the VTT file recorded alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePair {
    pub json: PathBuf,
    pub vtt: PathBuf,
}

/// Walks `root` recursively and returns every `*.json` file that has a
/// `*.vtt` sibling with the same stem, in path order. Hidden entries are
/// skipped and symlinked directories are not followed.
pub fn discover_pairs(root: &Path) -> Result<Vec<SourcePair>, IngestError> {
    if !root.is_dir() {
        return Err(IngestError::DirectoryNotFound(root.display().to_string()));
    }

    let mut pairs = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if dir == root => return Err(e.into()),
            Err(e) => {
                log::warn!("Failed to read directory {}: {}", dir.display(), e);
                continue;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Failed to read entry in {}: {}", dir.display(), e);
                    continue;
                }
            };

            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }

            let path = entry.path();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if is_dir {
                pending.push(path);
                continue;
            }

            if path.extension().is_some_and(|ext| ext == "json") && path.is_file() {
                let vtt = path.with_extension("vtt");
                if vtt.is_file() {
                    pairs.push(SourcePair { json: path, vtt });
                } else {
                    log::debug!("No VTT partner for {}", path.display());
                }
            }
        }
    }

    pairs.sort_by(|a, b| a.json.cmp(&b.json));
    Ok(pairs)
}
