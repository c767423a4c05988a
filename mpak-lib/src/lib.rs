use serde::{Deserialize, Serialize};

/// Build settings shared by every configuration layer (env, file, CLI).
/// All fields are optional so the layers can be merged field by field.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// Workspace root holding the mod folders. Defaults to the current directory.
    pub root: Option<String>,
    /// Output directory for archives, or an http(s) URL to upload them to.
    pub output: Option<String>,
    /// Path to a YAML or JSON configuration file.
    pub config: Option<String>,
    /// Archive file extension, without the dot. Defaults to "pk3".
    pub extension: Option<String>,
    /// List what would be built without writing anything.
    pub dry: Option<bool>,
    /// Glob patterns excluded from discovery and folder walks.
    pub skip: Option<Vec<String>>,
    /// Deflate entries (default). `false` stores them uncompressed.
    pub compress: Option<bool>,
    /// Wait for Enter after the summary before exiting.
    pub pause: Option<bool>,
}
