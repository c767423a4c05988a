use anyhow::{Result, bail};
use std::collections::HashMap;

use crate::fs_utils::ModFolder;

/// Builds the output archive name for a mod folder: spaces become underscores
/// and the archive extension is appended. Only the top-level folder name is
/// transformed; entry paths inside the archive keep their original spelling.
pub fn archive_file_name(folder_name: &str, extension: &str) -> String {
    format!("{}.{}", folder_name.replace(' ', "_"), extension)
}

/// Rejects workspaces where two folder names collapse to the same archive
/// name after normalization ("My Mod" vs "My_Mod"). Checked before any
/// archive is written.
pub fn check_name_collisions(folders: &[ModFolder], extension: &str) -> Result<()> {
    let mut seen: HashMap<String, &str> = HashMap::new();

    for folder in folders {
        let archive = archive_file_name(&folder.name, extension);
        if let Some(previous) = seen.insert(archive.clone(), &folder.name) {
            bail!(
                "folders {previous:?} and {:?} both produce {archive:?}; rename one of them",
                folder.name
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn folder(name: &str) -> ModFolder {
        ModFolder {
            name: name.to_string(),
            path: PathBuf::from(name),
        }
    }

    #[test]
    fn spaces_become_underscores() {
        assert_eq!(archive_file_name("My Cool Mod", "pk3"), "My_Cool_Mod.pk3");
        assert_eq!(archive_file_name("plain", "zip"), "plain.zip");
    }

    #[test]
    fn distinct_names_pass() {
        let folders = vec![folder("ModA"), folder("ModB")];
        assert!(check_name_collisions(&folders, "pk3").is_ok());
    }

    #[test]
    fn normalization_collision_is_an_error() {
        let folders = vec![folder("My Mod"), folder("My_Mod")];
        let err = check_name_collisions(&folders, "pk3").unwrap_err();
        assert!(err.to_string().contains("My_Mod.pk3"));
    }
}
