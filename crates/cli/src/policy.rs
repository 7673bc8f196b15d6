//! Match policy discovery and `vinvegan config`.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use vinvegan_match::MatchPolicy;

use crate::exit_codes::{EXIT_CONFIG_INVALID, EXIT_CONFIG_NOT_FOUND, EXIT_INPUT_READ};
use crate::CliError;

const LOCAL_FILE: &str = "vinvegan.toml";
const APP_DIR: &str = "vinvegan";
const USER_FILE: &str = "config.toml";

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Parse and validate a policy file
    #[command(after_help = "\
Examples:
  vinvegan config validate
  vinvegan config validate policies/strict.toml")]
    Validate {
        /// Policy file (default: the discovered one)
        path: Option<PathBuf>,
    },

    /// Print the effective policy as TOML
    #[command(after_help = "\
Examples:
  vinvegan config show > vinvegan.toml")]
    Show,

    /// Print which policy file would be used
    Path,
}

/// A policy and the file it came from (`None` for built-in defaults).
pub struct LoadedPolicy {
    pub policy: MatchPolicy,
    pub source: Option<PathBuf>,
}

impl LoadedPolicy {
    pub fn describe(&self) -> String {
        match &self.source {
            Some(path) => path.display().to_string(),
            None => "built-in defaults".to_string(),
        }
    }
}

fn user_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(USER_FILE))
}

/// First existing candidate: `./vinvegan.toml`, then the user config dir.
pub fn discover() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_FILE);
    if local.is_file() {
        return Some(local);
    }
    user_config_file().filter(|p| p.is_file())
}

pub fn read_policy(path: &Path) -> Result<MatchPolicy, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::new(EXIT_INPUT_READ, format!("cannot read config {}: {e}", path.display()))
    })?;
    MatchPolicy::from_toml(&text).map_err(|e| {
        CliError::new(EXIT_CONFIG_INVALID, format!("{}: {e}", path.display()))
    })
}

/// Explicit `--config` wins and must exist; otherwise discovery, otherwise defaults.
pub fn load(explicit: Option<&Path>) -> Result<LoadedPolicy, CliError> {
    let source = match explicit {
        Some(path) if !path.is_file() => {
            return Err(CliError::new(
                EXIT_CONFIG_NOT_FOUND,
                format!("config file not found: {}", path.display()),
            )
            .with_hint("run `vinvegan config show > vinvegan.toml` to start from the defaults"));
        }
        Some(path) => Some(path.to_path_buf()),
        None => discover(),
    };

    let policy = match &source {
        Some(path) => read_policy(path)?,
        None => MatchPolicy::default(),
    };

    let loaded = LoadedPolicy { policy, source };
    log::debug!("using policy '{}' from {}", loaded.policy.name, loaded.describe());
    Ok(loaded)
}

pub fn cmd_config(explicit: Option<&Path>, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Validate { path } => {
            let loaded = match path {
                Some(path) => load(Some(&path))?,
                None => load(explicit)?,
            };
            let n = &loaded.policy.normalization;
            eprintln!(
                "valid: policy '{}' from {} ({} abbreviations, {} stopwords, {} legal suffixes)",
                loaded.policy.name,
                loaded.describe(),
                n.abbreviations.len(),
                n.static_stopwords.len(),
                n.legal_suffixes.len(),
            );
            Ok(())
        }
        ConfigCommands::Show => {
            let loaded = load(explicit)?;
            let text = loaded.policy.to_toml()?;
            eprintln!("# source: {}", loaded.describe());
            print!("{text}");
            Ok(())
        }
        ConfigCommands::Path => {
            let loaded = load(explicit)?;
            println!("{}", loaded.describe());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = load(Some(&dir.path().join("nope.toml"))).err().unwrap();
        assert_eq!(err.code, EXIT_CONFIG_NOT_FOUND);
        assert!(err.hint.is_some());
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p.toml");
        fs::write(&path, "name = \"strict\"\n[thresholds]\nbase_similarity = 0.9\n").unwrap();
        let loaded = load(Some(&path)).unwrap();
        assert_eq!(loaded.policy.name, "strict");
        assert_eq!(loaded.policy.thresholds.base_similarity, 0.9);
        assert_eq!(loaded.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn invalid_file_maps_to_config_code() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[thresholds]\nbase_similarity = 85\n").unwrap();
        let err = read_policy(&path).err().unwrap();
        assert_eq!(err.code, EXIT_CONFIG_INVALID);
        assert!(err.message.contains("bad.toml"));
    }
}
