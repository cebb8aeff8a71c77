use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tagmark_engine::{DEFAULT_BULLET, DEFAULT_LINE_BREAK, InlineClass, TagMap};
use thiserror::Error;

fn tag_name_regex() -> &'static Regex {
    static TAG_NAME: OnceLock<Regex> = OnceLock::new();
    TAG_NAME.get_or_init(|| Regex::new(r"^[a-z][a-z0-9-]*$").expect("Invalid tag name regex"))
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid tag name `{tag}` for class `{class}`")]
    InvalidTag { class: String, tag: String },

    #[error("Unknown class `{0}` in tag table")]
    UnknownClass(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Token joined between exported lines
    pub line_break: String,
    /// Glyph shown for unordered list items
    pub bullet: String,
    /// Class name to element name overrides, merged onto the defaults
    pub tags: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            line_break: DEFAULT_LINE_BREAK.to_string(),
            bullet: DEFAULT_BULLET.to_string(),
            tags: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;
        config.validate()?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/tagmark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Check every override names a known class and a usable element.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (class, tag) in &self.tags {
            if class != "list" && class.parse::<InlineClass>().is_err() {
                return Err(ConfigError::UnknownClass(class.clone()));
            }
            if !tag_name_regex().is_match(tag) {
                return Err(ConfigError::InvalidTag {
                    class: class.clone(),
                    tag: tag.clone(),
                });
            }
        }
        Ok(())
    }

    /// Default tag table with this config's overrides applied.
    pub fn tag_map(&self) -> Result<TagMap, ConfigError> {
        self.validate()?;
        let mut tags = TagMap::default();
        for (class, tag) in &self.tags {
            tags.set(class.as_str(), tag.as_str());
        }
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/tagmark/config.toml"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.line_break, "<br />");
        assert_eq!(config.bullet, "\u{2022}");
        assert_eq!(config.tag_map().unwrap(), TagMap::default());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("bullet = \"-\"\n").unwrap();
        assert_eq!(config.bullet, "-");
        assert_eq!(config.line_break, "<br />");
        assert!(config.tags.is_empty());
    }

    #[test]
    fn test_tag_overrides_merge_onto_defaults() {
        let config: Config = toml::from_str(
            r#"
[tags]
bold = "b"
annotation = "mark-note"
"#,
        )
        .unwrap();
        let tags = config.tag_map().unwrap();
        assert_eq!(tags.tag_for(InlineClass::Bold), "b");
        assert_eq!(tags.tag_for(InlineClass::Annotation), "mark-note");
        assert_eq!(tags.tag_for(InlineClass::Italic), "em");
    }

    #[test]
    fn test_invalid_tag_name() {
        let mut config = Config::default();
        config.tags.insert("bold".into(), "Strong Tag".into());
        assert!(matches!(
            config.tag_map(),
            Err(ConfigError::InvalidTag { ref tag, .. }) if tag == "Strong Tag"
        ));
    }

    #[test]
    fn test_unknown_class() {
        let mut config = Config::default();
        config.tags.insert("shouting".into(), "caps".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownClass(ref class)) if class == "shouting"
        ));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_rejects_bad_tag() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[tags]\nitalic = \"1em\"\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTag { .. }));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "line_break = [").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/dir/config.toml");
        let mut test_config = Config {
            line_break: "\n".into(),
            ..Config::default()
        };
        test_config.tags.insert("list".into(), "item".into());

        test_config.save_to_path(&config_file).unwrap();
        assert!(config_file.exists(), "Config file should exist");

        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(loaded_config, test_config);
        assert_eq!(loaded_config.tag_map().unwrap().list_item_tag(), "item");
    }
}
