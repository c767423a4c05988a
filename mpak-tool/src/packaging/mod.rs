use std::path::{Path, PathBuf};

pub mod zip;

/// Represents a file to include in the archive.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name_in_archive: String,
}

/// Compression mode to use when creating the archive.
#[derive(Debug, Clone, Copy)]
pub enum Compressor {
    Deflate,
    Stored,
}

/// Maps walked file paths to archive entries named relative to the folder
/// root, so the archive's internal layout mirrors the folder's layout.
pub fn prepare_entries(files: Vec<PathBuf>, base: &Path) -> Vec<FileEntry> {
    files
        .into_iter()
        .map(|path| {
            let name_in_archive = entry_name(&path, base);
            FileEntry {
                path,
                name_in_archive,
            }
        })
        .collect()
}

/// Entry names always use `/` separators, regardless of the host platform.
fn entry_name(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
