//! Command catalog configuration
//!
//! A catalog is a YAML file of named command templates:
//!
//! ```yaml
//! commands:
//!   backup:
//!     command: "cp {src} {dst}"
//!     variables:
//!       src: "/etc/hosts"
//!       dst: "/tmp/hosts.bak"
//! ```
//!
//! # Loading Priority
//!
//! 1. `CMDKIT_CONFIG=/path/to/catalog.yaml` (explicit)
//! 2. `--config` file passed on the command line
//! 3. `~/.config/cmdkit/cmdkit.yaml` and `./cmdkit.yaml`, merged in order
//!    (later files win per command name)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cmdkit_core::{CmdResult, Command};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid variable assignment '{0}', expected NAME=VALUE")]
    InvalidAssignment(String),
}

/// A named command template.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CommandSpec {
    /// Shell-syntax command line, possibly containing `{name}` tokens.
    pub command: String,
    /// Default variable values; command-line assignments overlay these.
    pub variables: BTreeMap<String, String>,
    /// Print the resolved command line before executing.
    pub echo: bool,
}

impl CommandSpec {
    /// Build a runnable command from this template.
    pub fn to_command(&self) -> CmdResult<Command> {
        let mut cmd = Command::new(&self.command)?;
        for (name, value) in &self.variables {
            cmd.set_var(name, value.as_str())?;
        }
        Ok(cmd)
    }
}

/// The full catalog.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Catalog {
    pub commands: BTreeMap<String, CommandSpec>,
}

impl Catalog {
    pub fn get(&self, name: &str) -> Result<&CommandSpec, ConfigError> {
        self.commands
            .get(name)
            .ok_or_else(|| ConfigError::UnknownCommand(name.to_string()))
    }
}

pub struct CatalogLoader {
    explicit_file: Option<PathBuf>,
    search_paths: Vec<PathBuf>,
}

impl Default for CatalogLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogLoader {
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        if let Some(home) = dirs::home_dir() {
            search_paths.push(home.join(".config/cmdkit/cmdkit.yaml"));
        }
        search_paths.push(PathBuf::from("./cmdkit.yaml"));

        Self {
            explicit_file: None,
            search_paths,
        }
    }

    #[must_use]
    pub fn with_file(mut self, path: &str) -> Self {
        let expanded = shellexpand::tilde(path).into_owned();
        self.explicit_file = Some(PathBuf::from(expanded));
        self
    }

    pub fn load(&self) -> Result<Catalog, ConfigError> {
        if let Ok(env_path) = std::env::var("CMDKIT_CONFIG") {
            return Self::read(Path::new(&env_path));
        }
        if let Some(ref explicit) = self.explicit_file {
            return Self::read(explicit);
        }

        let mut catalog = Catalog::default();
        for path in &self.search_paths {
            if path.exists() {
                if let Ok(content) = std::fs::read_to_string(path) {
                    let overlay: Catalog = serde_yaml::from_str(&content)?;
                    catalog.commands.extend(overlay.commands);
                }
            }
        }
        Ok(catalog)
    }

    fn read(path: &Path) -> Result<Catalog, ConfigError> {
        tracing::debug!(path = %path.display(), "Loading catalog");
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_catalog() {
        let yaml = r#"
commands:
  backup:
    command: "cp {src} {dst}"
"#;
        let catalog: Catalog = serde_yaml::from_str(yaml).expect("parse failed");
        let spec = catalog.get("backup").expect("missing entry");
        assert_eq!(spec.command, "cp {src} {dst}");
        assert!(spec.variables.is_empty());
        assert!(!spec.echo);
    }

    #[test]
    fn parse_full_entry() {
        let yaml = r#"
commands:
  backup:
    command: "cp {src} {dst}"
    variables:
      src: "/etc/hosts"
      dst: "/tmp/hosts.bak"
    echo: true
"#;
        let catalog: Catalog = serde_yaml::from_str(yaml).expect("parse failed");
        let spec = catalog.get("backup").expect("missing entry");
        assert_eq!(spec.variables["src"], "/etc/hosts");
        assert!(spec.echo);
    }

    #[test]
    fn unknown_command_is_error() {
        let catalog = Catalog::default();
        let err = catalog.get("nope").expect_err("expected error");
        assert!(matches!(err, ConfigError::UnknownCommand(name) if name == "nope"));
    }

    #[test]
    fn spec_builds_resolvable_command() {
        let yaml = r#"
commands:
  backup:
    command: "cp {src} {dst}"
    variables:
      src: "/etc/hosts"
      dst: "/tmp/hosts.bak"
"#;
        let catalog: Catalog = serde_yaml::from_str(yaml).expect("parse failed");
        let cmd = catalog
            .get("backup")
            .expect("missing entry")
            .to_command()
            .expect("build failed");
        let argv = cmd.resolve_args().expect("resolve failed");
        assert_eq!(argv, ["cp", "/etc/hosts", "/tmp/hosts.bak"]);
    }

    #[test]
    fn explicit_file_is_loaded() {
        let scratch = tempfile::tempdir().expect("tempdir failed");
        let path = scratch.path().join("catalog.yaml");
        std::fs::write(&path, "commands:\n  noop:\n    command: \"true\"\n")
            .expect("write failed");

        let catalog = CatalogLoader::new()
            .with_file(&path.to_string_lossy())
            .load()
            .expect("load failed");
        assert!(catalog.commands.contains_key("noop"));
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let err = CatalogLoader::new()
            .with_file("/no/such/cmdkit.yaml")
            .load()
            .expect_err("expected read error");
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}
