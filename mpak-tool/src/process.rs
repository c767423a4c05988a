use anyhow::{Context, Result};
use chrono::Local;
use std::io::Write;
use std::path::{Path, PathBuf};

use mpak_lib::Config;

use crate::fs_utils::{self, FileWalker, LocalFileWalker};
use crate::naming;
use crate::packaging::{Compressor, prepare_entries};
use crate::sink::{OutSink, stream_zip_to_sink};

/// Builds every eligible mod folder, managing its own async runtime.
///
/// This is the main entrypoint for the synchronous CLI.
pub fn build_all_within_tokio(config: Config) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all() // Enables both IO and time drivers
        .build()?;

    runtime.block_on(build_all(&config))?;

    if config.pause.unwrap_or(false) {
        pause_for_enter()?;
    }
    Ok(())
}

/// Builds against the real filesystem.
pub async fn build_all(config: &Config) -> Result<usize> {
    build_all_with(&LocalFileWalker, config).await
}

/// Discovers mod folders under the workspace root and packages each one in
/// sequence. The first error aborts the run; archives already written by
/// earlier iterations stay on disk.
///
/// Returns the number of mods built (or that would be built, in a dry run).
pub async fn build_all_with(walker: &dyn FileWalker, config: &Config) -> Result<usize> {
    let root = PathBuf::from(config.root.as_deref().unwrap_or("."));
    let extension = config.extension.as_deref().unwrap_or("pk3");
    let skip = fs_utils::compile_skip_patterns(config.skip.as_ref())?;

    let folders = walker.list_mod_folders(&root, &skip)?;
    if folders.is_empty() {
        println!("No mod folders found to build.");
        return Ok(0);
    }

    naming::check_name_collisions(&folders, extension)?;

    println!("Building all mods...");
    println!();

    let total = folders.len();
    let dry = config.dry.unwrap_or(false);
    let compressor = if config.compress.unwrap_or(true) {
        Compressor::Deflate
    } else {
        Compressor::Stored
    };

    for (index, folder) in folders.iter().enumerate() {
        let output_name = naming::archive_file_name(&folder.name, extension);
        println!("[{}/{}] Building {}...", index + 1, total, output_name);

        let files = walker.list_folder_files(&folder.path, &skip)?;
        let byte_total = fs_utils::total_size(&files)?;
        let entries = prepare_entries(files, &folder.path);

        if dry {
            for entry in &entries {
                println!("  {} -> {}", entry.path.display(), entry.name_in_archive);
            }
            println!(
                "      Would write {} ({} files, {})",
                output_name,
                entries.len(),
                fs_utils::encode_size(byte_total)
            );
            continue;
        }

        let sink = resolve_sink(config, &root, &output_name);
        stream_zip_to_sink(compressor, entries, sink)
            .await
            .with_context(|| format!("building {}", folder.name))?;

        println!("      Done: {output_name}");
    }

    println!();
    println!("{}", "=".repeat(76));
    if dry {
        println!("Dry run complete! {total} mod(s) would be built");
    } else {
        println!(
            "Build complete! Built {total} mod(s) at {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
    }
    println!("{}", "=".repeat(76));

    Ok(total)
}

/// Archives land next to the mod folders by default; an `output` directory
/// redirects them, and an http(s) `output` turns the build into an upload.
fn resolve_sink(config: &Config, root: &Path, output_name: &str) -> OutSink {
    match config.output.as_deref() {
        Some(output) if output.starts_with("http://") || output.starts_with("https://") => {
            OutSink::UploadToUrl(format!("{}/{}", output.trim_end_matches('/'), output_name))
        }
        Some(output) => OutSink::SaveToFile(Path::new(output).join(output_name)),
        None => OutSink::SaveToFile(root.join(output_name)),
    }
}

fn pause_for_enter() -> Result<()> {
    print!("Press Enter to exit...");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_utils::ModFolder;
    use glob::Pattern;

    /// Fixture walker serving a fixed folder layout without touching disk.
    struct FixtureWalker {
        folders: Vec<(&'static str, Vec<&'static str>)>,
    }

    impl FileWalker for FixtureWalker {
        fn list_mod_folders(&self, root: &Path, _skip: &[Pattern]) -> Result<Vec<ModFolder>> {
            Ok(self
                .folders
                .iter()
                .map(|(name, _)| ModFolder {
                    name: name.to_string(),
                    path: root.join(name),
                })
                .collect())
        }

        fn list_folder_files(&self, dir: &Path, _skip: &[Pattern]) -> Result<Vec<PathBuf>> {
            let name = dir.file_name().unwrap().to_string_lossy().to_string();
            let files = self
                .folders
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, files)| files.iter().map(|f| dir.join(f)).collect())
                .unwrap_or_default();
            Ok(files)
        }
    }

    #[tokio::test]
    async fn dry_run_counts_fixture_folders() {
        let walker = FixtureWalker {
            folders: vec![
                ("ModA", vec!["a.txt", "sub/b.txt"]),
                ("My Mod", vec!["c.txt"]),
            ],
        };
        let config = Config {
            root: Some("/fixture".to_string()),
            dry: Some(true),
            ..Default::default()
        };

        let built = build_all_with(&walker, &config).await.unwrap();
        assert_eq!(built, 2);
    }

    #[tokio::test]
    async fn fixture_collisions_are_rejected() {
        let walker = FixtureWalker {
            folders: vec![("My Mod", vec![]), ("My_Mod", vec![])],
        };
        let config = Config {
            root: Some("/fixture".to_string()),
            dry: Some(true),
            ..Default::default()
        };

        assert!(build_all_with(&walker, &config).await.is_err());
    }

    #[test]
    fn sink_defaults_to_root() {
        let config = Config::default();
        match resolve_sink(&config, Path::new("/work"), "ModA.pk3") {
            OutSink::SaveToFile(path) => assert_eq!(path, PathBuf::from("/work/ModA.pk3")),
            other => panic!("unexpected sink: {other:?}"),
        }
    }

    #[test]
    fn sink_honors_output_directory() {
        let config = Config {
            output: Some("/dist".to_string()),
            ..Default::default()
        };
        match resolve_sink(&config, Path::new("/work"), "ModA.pk3") {
            OutSink::SaveToFile(path) => assert_eq!(path, PathBuf::from("/dist/ModA.pk3")),
            other => panic!("unexpected sink: {other:?}"),
        }
    }

    #[test]
    fn http_output_switches_to_upload() {
        let config = Config {
            output: Some("https://mods.example.com/builds/".to_string()),
            ..Default::default()
        };
        match resolve_sink(&config, Path::new("/work"), "ModA.pk3") {
            OutSink::UploadToUrl(url) => {
                assert_eq!(url, "https://mods.example.com/builds/ModA.pk3")
            }
            other => panic!("unexpected sink: {other:?}"),
        }
    }
}
