use crate::constants::{
    CONFIG_SEARCH_PATHS, DEFAULT_GROUP_PREFIX, DEFAULT_IGNORED_NAMES, DEFAULT_IMAGE_FOLDER,
    DEFAULT_RULES, DEFAULT_SIMILARITY_THRESHOLD,
};
use crate::error::{OrganizeError, OrganizeResult};
use crate::models::FolderRule;
use crate::utils;
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Application configuration loaded from a TOML or JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Folder rules in priority order
    #[serde(
        alias = "FILE_EXTENSIONS",
        deserialize_with = "deserialize_rules",
        serialize_with = "serialize_rules"
    )]
    pub rules: Vec<FolderRule>,
    #[serde(default)]
    pub grouping: GroupingConfig,
    #[serde(default)]
    pub organizer: OrganizerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    pub enabled: bool,
    /// Rule whose files are grouped by similarity, matched case-insensitively
    pub image_folder: String,
    pub measure: MeasureKind,
    pub threshold: f64,
    pub folder_prefix: String,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            image_folder: DEFAULT_IMAGE_FOLDER.to_string(),
            measure: MeasureKind::default(),
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            folder_prefix: DEFAULT_GROUP_PREFIX.to_string(),
        }
    }
}

/// Perceptual comparison used to score image pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MeasureKind {
    #[default]
    PerceptualHash,
    Histogram,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizerConfig {
    pub skip_confirmation: bool,
    pub dry_run_default: bool,
    /// File names that are never moved
    pub ignore: Vec<String>,
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            skip_confirmation: false,
            dry_run_default: false,
            ignore: DEFAULT_IGNORED_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Load configuration from a file; `.json` files are parsed as JSON, everything else as TOML
    pub fn from_file<P: AsRef<Path>>(path: P) -> OrganizeResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            OrganizeError::config(format!("failed to read {}: {}", path.display(), e))
        })?;

        let is_json = utils::get_extension(path) == "json";
        let config = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
        .map_err(|e| match e {
            OrganizeError::Configuration(msg) => {
                OrganizeError::config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

        debug!(path = %path.display(), rules = config.rules.len(), "configuration loaded");
        Ok(config)
    }

    /// Parse TOML; a document that is only a folder-to-extensions table is
    /// read as the rule set with default grouping and organizer settings
    pub fn from_toml_str(content: &str) -> OrganizeResult<Self> {
        let config = match toml::from_str::<Config>(content) {
            Ok(config) => config,
            Err(e) => toml::from_str::<RuleSet>(content)
                .map(|set| Self::from_rules(set.rules))
                .map_err(|_| OrganizeError::config(format!("invalid TOML: {}", e)))?,
        };
        config.validated()
    }

    /// Parse JSON; a bare `{"folder": ["ext", ...]}` object is accepted like in TOML
    pub fn from_json_str(content: &str) -> OrganizeResult<Self> {
        let config = match serde_json::from_str::<Config>(content) {
            Ok(config) => config,
            Err(e) => serde_json::from_str::<RuleSet>(content)
                .map(|set| Self::from_rules(set.rules))
                .map_err(|_| OrganizeError::config(format!("invalid JSON: {}", e)))?,
        };
        config.validated()
    }

    /// Rules only, everything else at its default (not yet validated)
    pub fn from_rules(rules: Vec<FolderRule>) -> Self {
        Self {
            rules,
            grouping: GroupingConfig::default(),
            organizer: OrganizerConfig::default(),
        }
    }

    /// Load configuration from default location or return defaults
    pub fn load() -> OrganizeResult<Self> {
        for raw in CONFIG_SEARCH_PATHS {
            let path = match utils::expand_path(raw) {
                Ok(path) => path,
                Err(_) => continue,
            };
            if path.is_file() {
                info!(path = %path.display(), "using configuration file");
                return Self::from_file(&path);
            }
        }

        info!("no configuration file found, using built-in rules");
        Ok(Self::default())
    }

    /// Normalize extensions and reject malformed rule sets
    fn validated(mut self) -> OrganizeResult<Self> {
        let mut folders = HashSet::new();

        for rule in &mut self.rules {
            let folder = rule.folder.trim().to_string();
            if !utils::is_single_component(&folder) {
                return Err(OrganizeError::config(format!(
                    "folder name {:?} must be a single path component",
                    rule.folder
                )));
            }
            if !folders.insert(folder.to_lowercase()) {
                return Err(OrganizeError::config(format!(
                    "folder {:?} is defined more than once",
                    folder
                )));
            }
            rule.folder = folder;

            for ext in &mut rule.extensions {
                let normalized = ext.trim().trim_start_matches('.').to_lowercase();
                if normalized.is_empty() {
                    return Err(OrganizeError::config(format!(
                        "folder {:?} lists an empty extension",
                        rule.folder
                    )));
                }
                *ext = normalized;
            }
        }

        let threshold = self.grouping.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(OrganizeError::config(format!(
                "grouping.threshold must be between 0 and 1, got {}",
                threshold
            )));
        }
        if !utils::is_single_component(self.grouping.folder_prefix.trim()) {
            return Err(OrganizeError::config(format!(
                "grouping.folder_prefix {:?} must be a single path component",
                self.grouping.folder_prefix
            )));
        }

        Ok(self)
    }

    /// The rule whose files take part in similarity grouping, if configured
    pub fn image_rule(&self) -> Option<&FolderRule> {
        self.rules
            .iter()
            .find(|rule| rule.folder.eq_ignore_ascii_case(&self.grouping.image_folder))
    }

    /// Like `image_rule`, but a missing rule is a configuration error
    pub fn require_image_rule(&self) -> OrganizeResult<&FolderRule> {
        self.image_rule().ok_or_else(|| {
            OrganizeError::config(format!(
                "similarity grouping needs a rule named {:?}; add it or disable grouping",
                self.grouping.image_folder
            ))
        })
    }

    /// Override the similarity threshold; the range is re-checked
    pub fn with_threshold(mut self, threshold: f64) -> OrganizeResult<Self> {
        self.grouping.threshold = threshold;
        self.validated()
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_rules(
            DEFAULT_RULES
                .iter()
                .map(|(folder, exts)| FolderRule::new(*folder, exts))
                .collect(),
        )
    }
}

/// A whole document holding nothing but rules
#[derive(Deserialize)]
#[serde(transparent)]
struct RuleSet {
    #[serde(deserialize_with = "deserialize_rules")]
    rules: Vec<FolderRule>,
}

/// Accepts `{ folder = [exts] }` maps or `[{ folder, extensions }]` lists, keeping document order
fn deserialize_rules<'de, D>(deserializer: D) -> Result<Vec<FolderRule>, D::Error>
where
    D: Deserializer<'de>,
{
    struct RulesVisitor;

    impl<'de> Visitor<'de> for RulesVisitor {
        type Value = Vec<FolderRule>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of folder names to extension lists, or a list of rules")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut rules = Vec::new();
            while let Some((folder, extensions)) = map.next_entry::<String, Vec<String>>()? {
                rules.push(FolderRule { folder, extensions });
            }
            Ok(rules)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut rules = Vec::new();
            while let Some(rule) = seq.next_element::<FolderRule>()? {
                rules.push(rule);
            }
            Ok(rules)
        }
    }

    deserializer.deserialize_any(RulesVisitor)
}

fn serialize_rules<S>(rules: &[FolderRule], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(rules.len()))?;
    for rule in rules {
        map.serialize_entry(&rule.folder, &rule.extensions)?;
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.rules[0].folder, "documents");
        assert!(config.image_rule().is_some());
        assert!(config.grouping.enabled);
        assert_eq!(config.grouping.measure, MeasureKind::PerceptualHash);
        assert!(config.organizer.ignore.contains(&".DS_Store".to_string()));
    }

    #[test]
    fn test_config_from_toml_keeps_order_and_normalizes() {
        let config = Config::from_toml_str(
            r#"
[rules]
zeta = [".TXT", "Md"]
alpha = ["png"]

[grouping]
image_folder = "alpha"
threshold = 0.5
"#,
        )
        .unwrap();

        let folders: Vec<_> = config.rules.iter().map(|r| r.folder.as_str()).collect();
        assert_eq!(folders, vec!["zeta", "alpha"]);
        assert_eq!(config.rules[0].extensions, vec!["txt", "md"]);
        assert_eq!(config.grouping.threshold, 0.5);
        assert_eq!(config.grouping.folder_prefix, "group");
    }

    #[test]
    fn test_config_from_toml_rule_list() {
        let config = Config::from_toml_str(
            r#"
[[rules]]
folder = "documents"
extensions = ["txt"]

[[rules]]
folder = "images"
extensions = ["jpg"]
"#,
        )
        .unwrap();
        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[1].folder, "images");
    }

    #[test]
    fn test_config_from_json_mapping() {
        let config =
            Config::from_json_str(r#"{"rules": {"Documents": ["txt"], "Images": ["JPG"]}}"#)
                .unwrap();
        assert_eq!(config.rules[0].folder, "Documents");
        assert_eq!(config.rules[1].extensions, vec!["jpg"]);
        // image folder is matched case-insensitively
        assert_eq!(config.image_rule().unwrap().folder, "Images");
    }

    #[test]
    fn test_config_from_json_legacy_key() {
        let config = Config::from_json_str(
            r#"{"FILE_EXTENSIONS": {"images": ["png"]}, "grouping": {"measure": "histogram"}}"#,
        )
        .unwrap();
        assert_eq!(config.rules[0].folder, "images");
        assert_eq!(config.grouping.measure, MeasureKind::Histogram);
    }

    #[test]
    fn test_config_from_bare_json_mapping() {
        let config =
            Config::from_json_str(r#"{"Documents": ["txt"], "Images": ["jpg"]}"#).unwrap();
        let folders: Vec<_> = config.rules.iter().map(|r| r.folder.as_str()).collect();
        assert_eq!(folders, vec!["Documents", "Images"]);
        assert_eq!(config.rules[1].extensions, vec!["jpg"]);
        assert!(config.grouping.enabled);
        assert_eq!(config.image_rule().unwrap().folder, "Images");
    }

    #[test]
    fn test_config_from_bare_toml_table() {
        let config = Config::from_toml_str("Documents = [\"TXT\"]\nImages = [\".jpg\"]\n").unwrap();
        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[0].extensions, vec!["txt"]);
        assert_eq!(config.rules[1].extensions, vec!["jpg"]);
    }

    #[test]
    fn test_config_bare_mapping_with_bad_values_is_error() {
        let err = Config::from_json_str(r#"{"Documents": "txt"}"#).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn test_config_missing_rules_is_error() {
        let err = Config::from_toml_str("[grouping]\nenabled = false\n").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_config_rules_not_a_mapping() {
        let err = Config::from_json_str(r#"{"rules": "documents"}"#).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_config_rejects_bad_folder_names() {
        assert!(Config::from_json_str(r#"{"rules": {"../escape": ["txt"]}}"#).is_err());
        assert!(Config::from_json_str(r#"{"rules": {"a/b": ["txt"]}}"#).is_err());
        assert!(Config::from_json_str(r#"{"rules": {"": ["txt"]}}"#).is_err());
    }

    #[test]
    fn test_config_rejects_duplicate_folders() {
        let err = Config::from_json_str(r#"{"rules": [
            {"folder": "docs", "extensions": ["txt"]},
            {"folder": "DOCS", "extensions": ["md"]}
        ]}"#)
        .unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_config_rejects_empty_extension() {
        assert!(Config::from_json_str(r#"{"rules": {"docs": ["."]}}"#).is_err());
    }

    #[test]
    fn test_config_rejects_threshold_out_of_range() {
        let err = Config::from_toml_str("[rules]\nimages = [\"png\"]\n[grouping]\nthreshold = 1.5\n")
            .unwrap_err();
        assert!(err.to_string().contains("threshold"));
    }

    #[test]
    fn test_with_threshold() {
        let config = Config::default().with_threshold(0.6).unwrap();
        assert_eq!(config.grouping.threshold, 0.6);
        assert!(Config::default().with_threshold(-0.1).is_err());
    }

    #[test]
    fn test_require_image_rule_missing() {
        let config = Config::from_json_str(r#"{"rules": {"Documents": ["txt"]}}"#).unwrap();
        let err = config.require_image_rule().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_config_from_file_by_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let json = dir.path().join("config.json");
        std::fs::write(&json, r#"{"rules": {"images": ["png"]}}"#).unwrap();
        let toml_path = dir.path().join("dirsort.toml");
        std::fs::write(&toml_path, "[rules]\nimages = [\"gif\"]\n").unwrap();

        assert_eq!(Config::from_file(&json).unwrap().rules[0].extensions, vec!["png"]);
        assert_eq!(Config::from_file(&toml_path).unwrap().rules[0].extensions, vec!["gif"]);
    }

    #[test]
    fn test_config_from_missing_file() {
        let err = Config::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_default_config_toml_roundtrip() {
        let text = Config::default().to_toml_string().unwrap();
        let parsed = Config::from_toml_str(&text).unwrap();
        assert_eq!(parsed.rules, Config::default().rules);
    }
}
