//! TOML configuration file for the CLI.
//!
//! ```toml
//! separator = "tab"
//!
//! [design]
//! decimals = 3
//! amplitude = 1.0
//! motion_file = "work/motion.par"
//! regressor_names = ["csf", "white_matter", "framewise_displacement"]
//! ```
//!
//! Command-line flags override values from the file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

use fmri_ingest::Separator;
use fmri_model::DesignOptions;

/// Separator setting: detect per file, or force one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SeparatorChoice {
    #[default]
    Auto,
    Tab,
    Comma,
}

impl SeparatorChoice {
    /// Forced separator, or `None` to detect.
    pub fn separator(self) -> Option<Separator> {
        match self {
            Self::Auto => None,
            Self::Tab => Some(Separator::Tab),
            Self::Comma => Some(Separator::Comma),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub separator: SeparatorChoice,
    pub design: DesignOptions,
}

/// Command-line values that take precedence over the configuration file.
#[derive(Debug, Clone, Default)]
pub struct DesignOverrides {
    pub decimals: Option<u32>,
    pub amplitude: Option<f64>,
    pub regressor_names: Vec<String>,
    pub motion_columns: Vec<String>,
    pub motion_file: Option<PathBuf>,
}

impl CliConfig {
    /// Loads the configuration file, or defaults when none is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))
    }

    /// Separator after applying the `--separator` flag.
    pub fn separator(&self, flag: Option<SeparatorChoice>) -> Option<Separator> {
        flag.unwrap_or(self.separator).separator()
    }

    /// Design options after applying flag overrides.
    ///
    /// Repeatable flags replace the configured list when given at least once.
    pub fn design_options(&self, overrides: &DesignOverrides) -> DesignOptions {
        let mut options = self.design.clone();
        if let Some(decimals) = overrides.decimals {
            options = options.with_decimals(decimals);
        }
        if let Some(amplitude) = overrides.amplitude {
            options = options.with_amplitude(amplitude);
        }
        if !overrides.regressor_names.is_empty() {
            options = options.with_regressor_names(Some(overrides.regressor_names.clone()));
        }
        if !overrides.motion_columns.is_empty() {
            options = options.with_motion_columns(overrides.motion_columns.clone());
        }
        if let Some(path) = &overrides.motion_file {
            options = options.with_motion_file(path.clone());
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_uses_defaults() {
        let config = CliConfig::load(None).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.separator(None), None);
    }

    #[test]
    fn file_values_and_flag_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fmri.toml");
        fs::write(
            &path,
            "separator = \"tab\"\n[design]\ndecimals = 2\nregressor_names = [\"csf\"]\n",
        )
        .unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.separator(None), Some(Separator::Tab));
        assert_eq!(config.separator(Some(SeparatorChoice::Auto)), None);

        let options = config.design_options(&DesignOverrides {
            amplitude: Some(0.5),
            ..DesignOverrides::default()
        });
        assert_eq!(options.decimals, 2);
        assert_eq!(options.amplitude, 0.5);
        assert_eq!(options.regressor_names, Some(vec!["csf".to_string()]));

        let options = config.design_options(&DesignOverrides {
            decimals: Some(4),
            regressor_names: vec!["wm".to_string()],
            ..DesignOverrides::default()
        });
        assert_eq!(options.decimals, 4);
        assert_eq!(options.regressor_names, Some(vec!["wm".to_string()]));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fmri.toml");
        fs::write(&path, "[design]\nprecision = 3\n").unwrap();
        let err = CliConfig::load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("parse config"));
    }
}
