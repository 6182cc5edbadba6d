//! Build configuration file loading.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::errors::{BuildError, BuildResult};
use crate::domain::model::{BuildMode, Constants, PathKind, Replacement};

pub const DEFAULT_CONFIG_FILE: &str = "build_config.json";

/// Build configuration as it appears on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub constants: Constants,
    #[serde(default)]
    pub common: Section,
    #[serde(default)]
    pub debug: Section,
    #[serde(default)]
    pub release: Section,
}

/// One layer of replacements and paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Section {
    #[serde(default)]
    pub replacements: Vec<Replacement>,
    #[serde(default)]
    pub paths: Vec<PathEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathEntry {
    #[serde(rename = "type")]
    pub kind: PathKind,
    pub source: PathBuf,
    pub dest: PathBuf,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    #[serde(default)]
    pub actions: Vec<ActionEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEntry {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

impl Config {
    /// Load the configuration file at `path`.
    pub fn load(path: &Path) -> BuildResult<Self> {
        let data = fs::read_to_string(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => {
                BuildError::Config(format!("config file not found: {}", path.display()))
            }
            _ => BuildError::Config(format!(
                "failed to read config file {}: {err}",
                path.display()
            )),
        })?;
        Self::from_json(&data).map_err(|err| match err {
            BuildError::Config(message) => {
                BuildError::Config(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_json(contents: &str) -> BuildResult<Self> {
        serde_json::from_str(contents)
            .map_err(|err| BuildError::Config(format!("failed to parse JSON config: {err}")))
    }

    /// The mode-specific section layered over `common`.
    pub fn mode_section(&self, mode: BuildMode) -> &Section {
        match mode {
            BuildMode::Debug => &self.debug,
            BuildMode::Release => &self.release,
        }
    }

    /// Path entries for `mode`: common entries first.
    pub fn paths_for(&self, mode: BuildMode) -> impl Iterator<Item = &PathEntry> {
        self.common
            .paths
            .iter()
            .chain(self.mode_section(mode).paths.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
{
  "constants": { "stylesheet_extension": ".scss" },
  "common": {
    "replacements": [{ "from": "@VERSION@", "to": "1.0" }],
    "paths": [
      { "type": "directory", "source": "styles", "dest": "css",
        "actions": [{ "action": "compile-stylesheet", "options": { "source_map": true } }] }
    ]
  },
  "debug": {
    "replacements": [{ "from": "@API@", "to": "http://localhost" }],
    "paths": [{ "type": "file", "source": "debug.js", "dest": "debug.js" }]
  },
  "release": {
    "replacements": [{ "from": "@API@", "to": "https://example.com" }]
  }
}
"#;

    #[test]
    fn debug_mode_layers_common_then_debug() {
        let config = Config::from_json(SAMPLE).expect("parse config");
        let paths: Vec<_> = config.paths_for(BuildMode::Debug).collect();

        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].kind, PathKind::Directory);
        assert_eq!(paths[0].actions[0].action, "compile-stylesheet");
        assert_eq!(paths[1].dest, PathBuf::from("debug.js"));
        assert_eq!(
            config.mode_section(BuildMode::Debug).replacements[0].to,
            "http://localhost"
        );
    }

    #[test]
    fn release_mode_ignores_debug_section() {
        let config = Config::from_json(SAMPLE).expect("parse config");
        assert_eq!(config.paths_for(BuildMode::Release).count(), 1);
        assert_eq!(
            config.mode_section(BuildMode::Release).replacements[0].to,
            "https://example.com"
        );
    }

    #[test]
    fn empty_object_is_a_valid_config() {
        let config = Config::from_json("{}").expect("parse");
        assert_eq!(config, Config::default());
        assert_eq!(config.constants.stylesheet_extension, ".scss");
    }

    #[test]
    fn missing_and_malformed_files_are_config_errors() -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempfile::tempdir()?;
        let missing = Config::load(&temp.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, BuildError::Config(ref m) if m.contains("not found")));

        let broken = temp.path().join("broken.json");
        fs::write(&broken, "{ this is not json")?;
        let err = Config::load(&broken).unwrap_err();
        assert!(matches!(err, BuildError::Config(ref m) if m.contains("broken.json")));
        Ok(())
    }

    #[test]
    fn unknown_path_kind_is_rejected() {
        let err = Config::from_json(
            r#"{"common": {"paths": [{"type": "glob", "source": "a", "dest": "b"}]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::Config(_)));
    }
}
