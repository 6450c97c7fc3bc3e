use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CLEAN_MARKER: &str = "nothing to commit, working tree clean";
pub const UP_TO_DATE_MARKER: &str = "(up to date)";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub report: ReportConfig,
    pub markers: Markers,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Output file used when `--output` is not given.
    pub output: Option<PathBuf>,
    /// Always tag the output file name with the run timestamp.
    pub timestamp: bool,
}

/// Phrases git prints when there is nothing to report. Output that lacks
/// them is flagged as having changes.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Markers {
    pub clean: String,
    pub up_to_date: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            clean: CLEAN_MARKER.to_string(),
            up_to_date: UP_TO_DATE_MARKER.to_string(),
        }
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let proj = directories::ProjectDirs::from("", "", "git-status-report")
        .context("could not determine config directory")?;
    Ok(proj.config_dir().join("config.toml"))
}

/// Load the config from an explicit path, which must exist, or from the
/// default location, falling back to defaults when that file is absent.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => load_config(path),
        None => {
            let path = default_config_path()?;
            if path.exists() {
                load_config(&path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config from {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("invalid config in {}", path.display()))
}

pub fn parse_config(contents: &str) -> Result<Config> {
    let config: Config = toml::from_str(contents).context("failed to parse config TOML")?;

    if config.markers.clean.is_empty() {
        bail!("markers.clean must not be empty");
    }
    if config.markers.up_to_date.is_empty() {
        bail!("markers.up_to_date must not be empty");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestEnv;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.markers.clean, CLEAN_MARKER);
        assert_eq!(config.markers.up_to_date, UP_TO_DATE_MARKER);
        assert!(config.report.output.is_none());
        assert!(!config.report.timestamp);
    }

    #[test]
    fn parses_all_sections() {
        let toml = r#"
[report]
output = "~/reports/status.txt"
timestamp = true

[markers]
clean = "nichts zu committen"
up_to_date = "(aktuell)"
"#;
        let config = parse_config(toml).unwrap();
        assert_eq!(
            config.report.output,
            Some(PathBuf::from("~/reports/status.txt"))
        );
        assert!(config.report.timestamp);
        assert_eq!(config.markers.clean, "nichts zu committen");
        assert_eq!(config.markers.up_to_date, "(aktuell)");
    }

    #[test]
    fn partial_markers_keep_other_default() {
        let config = parse_config("[markers]\nclean = \"all clean\"\n").unwrap();
        assert_eq!(config.markers.clean, "all clean");
        assert_eq!(config.markers.up_to_date, UP_TO_DATE_MARKER);
    }

    #[test]
    fn rejects_empty_marker() {
        let err = parse_config("[markers]\nup_to_date = \"\"\n").unwrap_err();
        assert!(err.to_string().contains("up_to_date"));
    }

    #[test]
    fn rejects_invalid_toml() {
        assert!(parse_config("[report\n").is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let env = TestEnv::new();
        let err = load(Some(env.root().join("missing.toml").as_path())).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to read config"));
    }

    #[test]
    fn load_reads_explicit_file() {
        let env = TestEnv::new();
        let path = env.write_file("config.toml", "[report]\ntimestamp = true\n");
        let config = load(Some(path.as_path())).unwrap();
        assert!(config.report.timestamp);
    }
}
