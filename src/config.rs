//! User configuration, read from `<config dir>/keycalc/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculator::{CalculatorMode, CalculatorState};
use crate::graph::GraphSettings;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mode the session starts in.
    pub mode: CalculatorMode,
    /// Whether trigonometric arguments are taken in degrees.
    pub degree_mode: bool,
    pub graph: GraphSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: CalculatorMode::Standard,
            degree_mode: true,
            graph: GraphSettings::default(),
        }
    }
}

/// Where the config file lives when no path is given.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("keycalc").join("config.toml"))
}

impl Config {
    /// Load the config.
    ///
    /// An explicit `path` must exist. Without one the default location is
    /// tried and a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse TOML text and normalize out-of-range values.
    pub fn from_toml(text: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(text).context("Failed to parse TOML")?;

        let graph = &mut config.graph;
        let density = graph.grid_density;
        graph.set_grid_density(density);
        graph.points = graph.points.max(1);

        if graph.x_range.0 >= graph.x_range.1 {
            anyhow::bail!("graph.x_range must be increasing: {:?}", graph.x_range);
        }
        if graph.y_range.0 >= graph.y_range.1 {
            anyhow::bail!("graph.y_range must be increasing: {:?}", graph.y_range);
        }

        Ok(config)
    }

    /// The calculator state a session starts from.
    pub fn initial_state(&self) -> CalculatorState {
        CalculatorState::default()
            .with_mode(self.mode)
            .with_degree_mode(self.degree_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.degree_mode);
        assert_eq!(config.graph.points, 1000);
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
            mode = "scientific"
            degree_mode = false

            [graph]
            points = 200
            x_range = [-5, 5]
            show_derivatives = true
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, CalculatorMode::Scientific);
        assert!(!config.degree_mode);
        assert_eq!(config.graph.points, 200);
        assert_eq!(config.graph.x_range, (-5.0, 5.0));
        assert_eq!(config.graph.y_range, (-10.0, 10.0));
        assert!(config.graph.show_derivatives);
        assert!(config.graph.show_grid);

        let state = config.initial_state();
        assert_eq!(state.mode, CalculatorMode::Scientific);
        assert!(!state.is_degree_mode);
        assert_eq!(state.display, "0");
    }

    #[test]
    fn test_grid_density_is_clamped() {
        let config = Config::from_toml("[graph]\ngrid_density = 40").unwrap();
        assert_eq!(config.graph.grid_density, 20);
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_toml("mode = \"programmer\"").is_err());
        assert!(Config::from_toml("[graph]\nx_range = [3, 1]").is_err());
    }

    #[test]
    fn test_missing_explicit_path() {
        let path = std::env::temp_dir().join("keycalc-missing-config.toml");
        assert!(Config::load(Some(&path)).is_err());
    }
}
