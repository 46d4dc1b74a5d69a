// Configuration loading and parsing (config/propsev.toml).

use propsev_core::adapter::{LabelMap, LabelTarget};
use propsev_core::names::{NameResolver, NameTableError};
use propsev_core::report::ReportLayout;
use propsev_feeds::labels::default_labels;
use propsev_feeds::FeedFormat;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file name inside `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "propsev.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// propsev.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data_paths: DataPaths,
    pub feeds: Vec<FeedConfig>,
    #[serde(default)]
    pub names: NamesConfig,
    #[serde(default)]
    pub labels: LabelOverrides,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub roster: String,
    /// Line-oriented `stat_key: weight` file. Built-in weights when absent.
    #[serde(default)]
    pub scoring_overrides: Option<String>,
}

/// One feed document, ingested in file order.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    pub name: String,
    pub format: FeedFormat,
    pub path: String,
}

/// Extra aliases and skip-list entries merged onto the built-in tables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamesConfig {
    #[serde(default)]
    pub aliases: HashMap<String, String>,
    #[serde(default)]
    pub skip: Vec<String>,
}

/// Extra label-map entries per feed format, e.g.
/// `"Rush + Rec Yards" = "rush_yards+receive_yards"`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelOverrides {
    #[serde(default)]
    pub html_list: HashMap<String, String>,
    #[serde(default)]
    pub odds_sheet: HashMap<String, String>,
    #[serde(default)]
    pub odds_tree: HashMap<String, String>,
}

impl LabelOverrides {
    pub fn for_format(&self, format: FeedFormat) -> &HashMap<String, String> {
        match format {
            FeedFormat::HtmlList => &self.html_list,
            FeedFormat::OddsSheet => &self.odds_sheet,
            FeedFormat::OddsTree => &self.odds_tree,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    pub top_n: usize,
    #[serde(default)]
    pub rb_passing: bool,
    #[serde(default)]
    pub wr_rushing: bool,
    /// Directory for per-position CSV output. No CSV output when absent.
    #[serde(default)]
    pub output_dir: Option<String>,
}

impl ReportConfig {
    pub fn layout(&self) -> ReportLayout {
        ReportLayout {
            rb_passing: self.rb_passing,
            wr_rushing: self.wr_rushing,
        }
    }
}

impl Config {
    /// The built-in label map for `format` with this config's entries on top.
    pub fn label_map(&self, format: FeedFormat) -> Result<LabelMap, ConfigError> {
        let mut map = default_labels(format);
        for (label, target) in self.labels.for_format(format) {
            map.insert(label, parse_label_target(format, label, target)?);
        }
        Ok(map)
    }

    /// The built-in name tables extended with this config's entries.
    pub fn name_resolver(&self) -> Result<NameResolver, NameTableError> {
        let mut resolver = NameResolver::default();
        resolver.extend_aliases(&self.names.aliases)?;
        resolver.extend_skip(&self.names.skip);
        Ok(resolver)
    }
}

fn parse_label_target(format: FeedFormat, label: &str, target: &str) -> Result<LabelTarget, ConfigError> {
    target.parse().map_err(|e| ConfigError::ValidationError {
        field: format!("labels.{format}.\"{label}\""),
        message: format!("{e}"),
    })
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/propsev.toml` relative to `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            // A user's edited copy is never replaced.
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.data_paths.roster.trim().is_empty() {
        return Err(invalid("data_paths.roster", "must not be empty"));
    }

    if config.feeds.is_empty() {
        return Err(invalid("feeds", "at least one feed is required"));
    }
    let mut seen = HashSet::new();
    for (i, feed) in config.feeds.iter().enumerate() {
        if feed.name.trim().is_empty() {
            return Err(invalid(format!("feeds[{i}].name"), "must not be empty"));
        }
        if !seen.insert(feed.name.as_str()) {
            return Err(invalid(
                format!("feeds[{i}].name"),
                format!("duplicate feed name `{}`", feed.name),
            ));
        }
        if feed.path.trim().is_empty() {
            return Err(invalid(format!("feeds[{i}].path"), "must not be empty"));
        }
    }

    for format in FeedFormat::ALL {
        for (label, target) in config.labels.for_format(format) {
            parse_label_target(format, label, target)?;
        }
    }

    for (alias, target) in &config.names.aliases {
        if target.trim().is_empty() || alias.trim() == target.trim() {
            return Err(invalid(
                format!("names.aliases.\"{alias}\""),
                "target must be a different, non-empty name",
            ));
        }
    }

    if config.report.top_n == 0 {
        return Err(invalid("report.top_n", "must be > 0"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use propsev_core::stats::StatKey;
    use std::fs;

    const MINIMAL: &str = r#"
[data_paths]
roster = "data/roster.csv"

[[feeds]]
name = "projections"
format = "html_list"
path = "data/feeds/projections.html"

[report]
top_n = 10
"#;

    fn parse(text: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("inline"),
            source: e,
        })?;
        validate(&config)?;
        Ok(config)
    }

    /// Helper: returns the crate root holding `defaults/`.
    fn project_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    }

    #[test]
    fn minimal_config_parses_with_defaults() {
        let config = parse(MINIMAL).unwrap();
        assert_eq!(config.data_paths.roster, "data/roster.csv");
        assert!(config.data_paths.scoring_overrides.is_none());
        assert_eq!(config.feeds.len(), 1);
        assert_eq!(config.feeds[0].format, FeedFormat::HtmlList);
        assert!(config.names.aliases.is_empty());
        assert_eq!(config.report.layout(), ReportLayout::default());
        assert!(config.report.output_dir.is_none());
    }

    #[test]
    fn load_default_config_from_project_files() {
        let root = project_root();
        let text = fs::read_to_string(root.join("defaults").join(CONFIG_FILE)).unwrap();
        let config = parse(&text).expect("shipped defaults should validate");
        assert_eq!(config.data_paths.scoring_overrides.as_deref(), Some("config/scoring.txt"));
        let formats: Vec<_> = config.feeds.iter().map(|f| f.format).collect();
        assert_eq!(
            formats,
            vec![FeedFormat::HtmlList, FeedFormat::OddsSheet, FeedFormat::OddsTree]
        );
        assert!(config.report.wr_rushing);
    }

    #[test]
    fn label_overrides_merge_onto_defaults() {
        let text = format!(
            "{MINIMAL}\n[labels.html_list]\n\"Scrimmage Yards\" = \"rush_yards+receive_yards\"\n\"Rushing Yards\" = \"receive_yards\"\n"
        );
        let config = parse(&text).unwrap();
        let map = config.label_map(FeedFormat::HtmlList).unwrap();
        assert_eq!(
            map.get("Scrimmage Yards"),
            Some(LabelTarget::Combined(StatKey::RushYards, StatKey::ReceiveYards))
        );
        assert_eq!(map.get("Rushing Yards"), Some(LabelTarget::Stat(StatKey::ReceiveYards)));
        assert_eq!(map.get("Receptions"), Some(LabelTarget::Stat(StatKey::Receptions)));
    }

    #[test]
    fn bad_label_target_rejected() {
        let text = format!("{MINIMAL}\n[labels.odds_sheet]\n\"Kicking Pts\" = \"kicking_points\"\n");
        let err = parse(&text).unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "labels.odds_sheet.\"Kicking Pts\"")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn name_tables_extended() {
        let text = format!(
            "{MINIMAL}\n[names]\nskip = [\"Old Vet\"]\n[names.aliases]\n\"Chris Rodriguez\" = \"Chris Rodriguez Jr.\"\n"
        );
        let config = parse(&text).unwrap();
        let resolver = config.name_resolver().unwrap();
        let builtin = NameResolver::default();
        assert_eq!(resolver.alias_count(), builtin.alias_count() + 1);
        assert_eq!(resolver.skip_count(), builtin.skip_count() + 1);
    }

    #[test]
    fn empty_feed_list_rejected() {
        let text = r#"
feeds = []

[data_paths]
roster = "data/roster.csv"

[report]
top_n = 10
"#;
        let err = parse(text).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { field, .. } if field == "feeds"));
    }

    #[test]
    fn duplicate_feed_names_rejected() {
        let text = format!(
            "{MINIMAL}\n[[feeds]]\nname = \"projections\"\nformat = \"odds_tree\"\npath = \"x.json\"\n"
        );
        let err = parse(&text).unwrap_err();
        assert!(err.to_string().contains("duplicate feed name"));
    }

    #[test]
    fn unknown_format_is_parse_error() {
        let text = MINIMAL.replace("html_list", "pdf_scan");
        assert!(matches!(parse(&text), Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn zero_top_n_rejected() {
        let text = MINIMAL.replace("top_n = 10", "top_n = 0");
        let err = parse(&text).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { field, .. } if field == "report.top_n"));
    }

    #[test]
    fn ensure_config_files_copies_without_overwriting() {
        let tmp = std::env::temp_dir().join("propsev_config_test_copy");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), MINIMAL).unwrap();
        fs::write(tmp.join("defaults").join("scoring.txt"), "receptions: 0.5\n").unwrap();
        fs::write(tmp.join("config").join("scoring.txt"), "receptions: 1.0\n").unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert_eq!(copied, vec![tmp.join("config").join(CONFIG_FILE)]);
        assert_eq!(
            fs::read_to_string(tmp.join("config").join("scoring.txt")).unwrap(),
            "receptions: 1.0\n"
        );
        assert!(load_config_from(&tmp).is_ok());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn second_bootstrap_copies_nothing() {
        let tmp = std::env::temp_dir().join("propsev_config_test_rerun");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), MINIMAL).unwrap();

        assert_eq!(ensure_config_files(&tmp).unwrap().len(), 1);
        let edited = MINIMAL.replace("top_n = 10", "top_n = 3");
        fs::write(tmp.join("config").join(CONFIG_FILE), &edited).unwrap();

        assert!(ensure_config_files(&tmp).unwrap().is_empty());
        assert_eq!(fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap(), edited);
        assert_eq!(load_config_from(&tmp).unwrap().report.top_n, 3);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_config_dir_and_defaults_is_error() {
        let tmp = std::env::temp_dir().join("propsev_config_test_empty");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            ensure_config_files(&tmp),
            Err(ConfigError::DefaultsCopyError { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }
}
