use clap::Parser;
use mpak_lib::Config;
use std::{collections::HashMap, env, fs};

use mpak_tool::process;

#[derive(Parser, Debug)]
#[command(author, version, about = "Mod folder packager", long_about = None)]
pub struct Cli {
    /// Workspace root containing the mod folders (defaults to the current directory)
    #[arg()]
    pub root: Option<String>,

    /// Output directory for archives, or an http(s) URL to upload them to
    #[arg(short, long)]
    pub output: Option<String>,

    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Archive extension, without the dot [default: pk3]
    #[arg(short, long)]
    pub extension: Option<String>,

    /// Dry run (list folders and files without writing archives)
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub dry: bool,

    /// Patterns to skip (can be specified multiple times)
    #[arg(short = 's', long)]
    pub skip: Vec<String>,

    /// Store entries without compression
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub store: bool,

    /// Wait for Enter after the summary before exiting
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub pause: bool,

    /// Generate YAML config to stdout
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub generate_yaml_config: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Step 1: Read environment
    let env_config = read_env();

    // Step 2: Read config file (if exists)
    let mut file_config = Config::default();
    if let Some(path) = cli.config.clone().or(env_config.config.clone()) {
        file_config = read_config_file(&path)?;
    }

    // Step 3: Merge configs: env < file < CLI
    let mut merged = merge_configs(env_config, file_config, cli_to_config(&cli));

    // Apply defaults for optional parameters
    if merged.root.is_none() {
        merged.root = Some(".".to_string());
    }
    if merged.extension.is_none() {
        merged.extension = Some("pk3".to_string());
    }
    if merged.compress.is_none() {
        merged.compress = Some(true);
    }

    // Generate YAML config if requested
    if cli.generate_yaml_config {
        let yaml = serde_yaml::to_string(&merged)?;
        println!("{yaml}");
        return Ok(());
    }

    process::build_all_within_tokio(merged)
}

/// Reads environment variables prefixed with MPAK_
fn read_env() -> Config {
    let vars: HashMap<String, String> = env::vars().collect();
    config_from_vars(&vars)
}

fn config_from_vars(vars: &HashMap<String, String>) -> Config {
    let mut cfg = Config::default();

    macro_rules! get_env {
        ($key:expr) => {
            vars.get(&format!("MPAK_{}", $key)).cloned()
        };
    }

    fn parse_bool(v: String) -> bool {
        v == "true" || v == "1" || v.eq_ignore_ascii_case("yes")
    }

    cfg.root = get_env!("ROOT");
    cfg.output = get_env!("OUTPUT");
    cfg.config = get_env!("CONFIG");
    cfg.extension = get_env!("EXTENSION");
    cfg.dry = get_env!("DRY").map(parse_bool);
    cfg.skip = get_env!("SKIP").map(|v| {
        v.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    });
    cfg.compress = get_env!("COMPRESS").map(parse_bool);
    cfg.pause = get_env!("PAUSE").map(parse_bool);
    cfg
}

/// Reads YAML or JSON config from file
fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let content = fs::read_to_string(path)?;
    let lower = path.to_lowercase();
    let cfg = if lower.ends_with(".json") {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    Ok(cfg)
}

/// Converts CLI struct into Config. Unset flags stay `None` so lower layers
/// can still provide them.
fn cli_to_config(cli: &Cli) -> Config {
    Config {
        root: cli.root.clone(),
        output: cli.output.clone(),
        config: cli.config.clone(),
        extension: cli.extension.clone(),
        dry: cli.dry.then_some(true),
        skip: if cli.skip.is_empty() {
            None
        } else {
            Some(cli.skip.clone())
        },
        compress: cli.store.then_some(false),
        pause: cli.pause.then_some(true),
    }
}

/// Merge configs by priority: env < file < cli
fn merge_configs(env: Config, file: Config, cli: Config) -> Config {
    fn pick<T: Clone>(env: Option<T>, file: Option<T>, cli: Option<T>) -> Option<T> {
        cli.or(file).or(env)
    }

    Config {
        root: pick(env.root, file.root, cli.root),
        output: pick(env.output, file.output, cli.output),
        config: pick(env.config, file.config, cli.config),
        extension: pick(env.extension, file.extension, cli.extension),
        dry: pick(env.dry, file.dry, cli.dry),
        skip: pick(env.skip, file.skip, cli.skip),
        compress: pick(env.compress, file.compress, cli.compress),
        pause: pick(env.pause, file.pause, cli.pause),
    }
}
