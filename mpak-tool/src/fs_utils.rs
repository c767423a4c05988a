use anyhow::{Context, Result};
use glob::Pattern;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Folders whose name starts with this marker are never built (staging, drafts).
pub const EXCLUDE_MARKER: char = '!';

/// A top-level directory that will be packaged into one archive.
#[derive(Debug, Clone)]
pub struct ModFolder {
    pub name: String,
    pub path: PathBuf,
}

/// Capability seam over directory traversal, so callers can substitute a
/// fixture for real disk I/O.
pub trait FileWalker {
    /// Lists the immediate subdirectories of `root` that are eligible for
    /// packaging. Marker-prefixed names and skip-pattern matches are left
    /// out. Order is whatever the underlying listing yields.
    fn list_mod_folders(&self, root: &Path, skip: &[Pattern]) -> Result<Vec<ModFolder>>;

    /// Recursively lists all files under `dir`, excluding skip-pattern matches.
    fn list_folder_files(&self, dir: &Path, skip: &[Pattern]) -> Result<Vec<PathBuf>>;
}

/// Walks the real filesystem.
pub struct LocalFileWalker;

impl FileWalker for LocalFileWalker {
    fn list_mod_folders(&self, root: &Path, skip: &[Pattern]) -> Result<Vec<ModFolder>> {
        let mut result = Vec::new();

        for entry in
            fs::read_dir(root).with_context(|| format!("reading workspace root {root:?}"))?
        {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = match path.file_name() {
                Some(n) => n.to_string_lossy().to_string(),
                None => continue,
            };
            if name.starts_with(EXCLUDE_MARKER) {
                continue;
            }
            if is_skipped(&path, skip) {
                continue;
            }
            result.push(ModFolder { name, path });
        }

        Ok(result)
    }

    fn list_folder_files(&self, dir: &Path, skip: &[Pattern]) -> Result<Vec<PathBuf>> {
        fn walk_dir(dir: &Path, patterns: &[Pattern], result: &mut Vec<PathBuf>) -> Result<()> {
            for entry in fs::read_dir(dir).with_context(|| format!("reading directory {dir:?}"))? {
                let entry = entry?;
                let path = entry.path();

                if is_skipped(&path, patterns) {
                    continue;
                }

                if path.is_dir() {
                    walk_dir(&path, patterns, result)?;
                } else {
                    result.push(path);
                }
            }
            Ok(())
        }

        let mut result = Vec::new();
        walk_dir(dir, skip, &mut result)?;
        Ok(result)
    }
}

/// Compiles skip globs with proper error reporting for bad patterns.
pub fn compile_skip_patterns(skip: Option<&Vec<String>>) -> Result<Vec<Pattern>> {
    skip.map(|patterns| {
        patterns
            .iter()
            .map(|p| Pattern::new(p).with_context(|| format!("invalid skip pattern: {p}")))
            .collect::<Result<Vec<_>>>()
    })
    .transpose()
    .map(|v| v.unwrap_or_default())
}

fn is_skipped(path: &Path, patterns: &[Pattern]) -> bool {
    let path_str = path.to_string_lossy();
    patterns.iter().any(|p| p.matches(&path_str))
}

/// Compute total size of all files.
pub fn total_size(files: &[PathBuf]) -> Result<u64> {
    let mut total: u64 = 0;
    for path in files {
        if path.is_file() {
            let meta = fs::metadata(path)?;
            total += meta.len();
        }
    }
    Ok(total)
}

/// Convert bytes into a human-friendly string using binary (KiB, MiB, GiB...) units.
pub fn encode_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    // Format with one decimal if needed (e.g., 1.0 MiB -> 1 MiB)
    if (size * 10.0) % 10.0 == 0.0 {
        format!("{:.0} {}", size, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
