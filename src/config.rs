use std::path::{Path, PathBuf};

use anyhow::Context;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ExitError;
use crate::intent::{ClassifierConfig, EmbeddingConfig};

/// Config file name constants.
pub const CONFIG_TOML: &str = ".steer.toml";
pub const CONFIG_JSON: &str = ".steer.json";

/// Find the project config, preferring .steer.toml over .steer.json, then
/// falling back to the user config directory.
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    find_config_with_user_dir(dir, dirs::config_dir().as_deref())
}

fn find_config_with_user_dir(dir: &Path, user_dir: Option<&Path>) -> Option<PathBuf> {
    let toml_path = dir.join(CONFIG_TOML);
    if toml_path.exists() {
        return Some(toml_path);
    }
    let json_path = dir.join(CONFIG_JSON);
    if json_path.exists() {
        return Some(json_path);
    }
    let user_path = user_dir?.join("steer").join("config.toml");
    user_path.exists().then_some(user_path)
}

/// Top-level .steer.toml config.
///
/// All structs use snake_case (TOML native) with `alias` attributes so that
/// camelCase JSON configs load too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Where the collaborator layers read from, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory of `<namespace>/<command>.md` files.
    #[serde(alias = "commandsDir")]
    pub commands_dir: String,
    /// JSON project state snapshot.
    #[serde(alias = "stateFile")]
    pub state_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            commands_dir: ".claude/commands".into(),
            state_file: ".planning/state.json".into(),
        }
    }
}

impl PathsConfig {
    pub fn commands_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.commands_dir)
    }

    pub fn state_file(&self, root: &Path) -> PathBuf {
        root.join(&self.state_file)
    }
}

impl Config {
    /// Load config from a file (TOML or JSON, auto-detected by extension).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let config = match ext {
            "json" => Self::parse_json(&contents)?,
            _ => Self::parse_toml(&contents)?,
        };
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load the discovered config for `root`, or defaults when there is none.
    pub fn load_or_default(root: &Path) -> anyhow::Result<Self> {
        match find_config(root) {
            Some(path) => Self::load(&path),
            None => {
                tracing::debug!(root = %root.display(), "no config found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse config from a TOML string.
    pub fn parse_toml(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| ExitError::Config(format!("invalid {CONFIG_TOML}: {e}")).into())
    }

    /// Parse config from a JSON string.
    pub fn parse_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ExitError::Config(format!("invalid {CONFIG_JSON}: {e}")).into())
    }

    /// Serialize config to a TOML string with section comments.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        fn set_table_comment(doc: &mut toml_edit::DocumentMut, key: &str, comment: &str) {
            if let Some(tbl) = doc.get_mut(key).and_then(toml_edit::Item::as_table_mut) {
                tbl.decor_mut().set_prefix(comment);
            }
        }

        let raw = toml::to_string_pretty(self).context("serializing config to TOML")?;
        let mut doc: toml_edit::DocumentMut = raw
            .parse()
            .context("parsing generated TOML for comment injection")?;

        doc.decor_mut().set_prefix("# steer intent classifier configuration\n\n");
        set_table_comment(
            &mut doc,
            "classifier",
            "# Thresholds are in [0, 1]; max_alternatives must be at least 1\n",
        );
        set_table_comment(
            &mut doc,
            "embedding",
            "\n# Ollama embedding backend, used only when enable_semantic = true\n",
        );
        set_table_comment(
            &mut doc,
            "paths",
            "\n# Command definitions and project state, relative to the project root\n",
        );

        Ok(doc.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_toml_config() {
        let toml_str = r#"
[classifier]
confidence_threshold = 0.7
ambiguity_gap = 0.05
max_alternatives = 4
semantic_threshold = 0.8
enable_semantic = true

[embedding]
base_url = "http://embed.local:11434"
model = "mxbai-embed-large"
timeout_secs = 3

[paths]
commands_dir = "commands"
state_file = "state.json"
"#;
        let config = Config::parse_toml(toml_str).unwrap();
        assert!((config.classifier.confidence_threshold - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.classifier.max_alternatives, 4);
        assert!(config.classifier.enable_semantic);
        assert_eq!(config.embedding.model, "mxbai-embed-large");
        assert_eq!(config.embedding.timeout_secs, 3);
        assert_eq!(config.paths.commands_dir, "commands");
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        assert_eq!(Config::parse_toml("").unwrap(), Config::default());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = Config::parse_toml("[classifier]\nambiguity_gap = 0.2\n").unwrap();
        assert!((config.classifier.ambiguity_gap - 0.2).abs() < f64::EPSILON);
        assert!((config.classifier.confidence_threshold - 0.6).abs() < f64::EPSILON);
        assert_eq!(config.paths, PathsConfig::default());
    }

    #[test]
    fn parse_json_config_with_camel_case() {
        let json = r#"{
            "classifier": {"confidenceThreshold": 0.5, "enableSemantic": true},
            "embedding": {"baseUrl": "http://x:1", "timeoutSecs": 1},
            "paths": {"commandsDir": "cmds", "stateFile": "s.json"}
        }"#;
        let config = Config::parse_json(json).unwrap();
        assert!((config.classifier.confidence_threshold - 0.5).abs() < f64::EPSILON);
        assert!(config.classifier.enable_semantic);
        assert_eq!(config.embedding.base_url, "http://x:1");
        assert_eq!(config.paths.state_file, "s.json");
    }

    #[test]
    fn invalid_toml_is_config_exit_error() {
        let err = Config::parse_toml("[classifier]\nmax_alternatives = \"many\"\n").unwrap_err();
        let exit = err.downcast_ref::<ExitError>().unwrap();
        assert!(matches!(exit, ExitError::Config(msg) if msg.contains(".steer.toml")));
    }

    #[test]
    fn to_toml_roundtrips_with_comments() {
        let config = Config::default();
        let toml_str = config.to_toml().unwrap();
        assert!(toml_str.contains("# steer intent classifier configuration"));
        assert!(toml_str.contains("# Ollama embedding backend"));
        assert!(toml_str.contains("[paths]"));
        assert_eq!(Config::parse_toml(&toml_str).unwrap(), config);
    }

    #[test]
    fn find_config_prefers_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_JSON), "{}").unwrap();
        std::fs::write(dir.path().join(CONFIG_TOML), "").unwrap();
        let found = find_config_with_user_dir(dir.path(), None).unwrap();
        assert!(found.ends_with(CONFIG_TOML));
    }

    #[test]
    fn find_config_falls_back_to_json_then_user_dir() {
        let project = tempfile::tempdir().unwrap();
        let user = tempfile::tempdir().unwrap();
        assert!(find_config_with_user_dir(project.path(), Some(user.path())).is_none());

        let user_config = user.path().join("steer");
        std::fs::create_dir_all(&user_config).unwrap();
        std::fs::write(user_config.join("config.toml"), "").unwrap();
        let found = find_config_with_user_dir(project.path(), Some(user.path())).unwrap();
        assert!(found.ends_with("steer/config.toml"));

        std::fs::write(project.path().join(CONFIG_JSON), "{}").unwrap();
        let found = find_config_with_user_dir(project.path(), Some(user.path())).unwrap();
        assert!(found.ends_with(CONFIG_JSON));
    }

    #[test]
    fn load_detects_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        std::fs::write(&path, r#"{"classifier": {"maxAlternatives": 2}}"#).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.classifier.max_alternatives, 2);
    }

    #[test]
    fn paths_resolve_against_root() {
        let paths = PathsConfig::default();
        let root = Path::new("/work/proj");
        assert_eq!(paths.commands_dir(root), root.join(".claude/commands"));
        assert_eq!(paths.state_file(root), root.join(".planning/state.json"));
    }
}
