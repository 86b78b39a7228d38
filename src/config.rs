use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigSortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    /// Wheel diameter in meters
    #[serde(default)]
    pub(crate) wheel_diameter_m: Option<f64>,
    /// Hours after UTC midnight at which a new day starts
    #[serde(default)]
    pub(crate) day_boundary_hours: Option<i64>,
    /// Sessions at or below this distance are ignored by min/max distance
    #[serde(default)]
    pub(crate) min_distance_m: Option<f64>,
    #[serde(default)]
    pub(crate) db: Option<PathBuf>,
    #[serde(default)]
    pub(crate) input: Option<PathBuf>,
    #[serde(default)]
    pub(crate) compact: bool,
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) order: Option<ConfigSortOrder>,
    #[serde(default)]
    pub(crate) color: Option<ConfigColorMode>,
    #[serde(default)]
    pub(crate) timezone: Option<String>,
    #[serde(default)]
    pub(crate) locale: Option<String>,
}

/// Result of the config search
///
/// Logging is not set up yet when the config is read, so the outcome is
/// reported by the caller once it is.
#[derive(Debug, Default)]
pub(crate) struct LoadedConfig {
    pub(crate) config: Config,
    pub(crate) path: Option<PathBuf>,
    pub(crate) warnings: Vec<String>,
}

impl Config {
    pub(crate) fn load() -> LoadedConfig {
        let mut loaded = LoadedConfig::default();

        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(config) => {
                        loaded.config = config;
                        loaded.path = Some(path);
                        return loaded;
                    }
                    Err(e) => {
                        loaded
                            .warnings
                            .push(format!("Failed to parse {}: {}", path.display(), e));
                    }
                }
            }
        }

        loaded
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // ~/.config/wheelstats/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("wheelstats").join("config.toml"));
        }

        // Platform config dir (Application Support on macOS)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("wheelstats").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // ~/.wheelstats.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".wheelstats.toml"));
        }

        paths
    }

    /// Session database used when neither `--db` nor `db` is given
    pub(crate) fn default_db_path() -> PathBuf {
        dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wheelstats")
            .join("sessions.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_paths_end_with_home_dotfile() {
        let paths = Config::get_config_paths();
        if dirs::home_dir().is_some() {
            assert!(paths.last().unwrap().ends_with(".wheelstats.toml"));
        }
    }

    #[test]
    fn parses_full_config() {
        let config: Config = toml::from_str(
            r#"
            wheel_diameter_m = 0.3
            day_boundary_hours = 0
            min_distance_m = 25.0
            db = "/tmp/wheel.db"
            compact = true
            order = "asc"
            color = "never"
            timezone = "Europe/Berlin"
            locale = "de"
            "#,
        )
        .unwrap();
        assert_eq!(config.wheel_diameter_m, Some(0.3));
        assert_eq!(config.day_boundary_hours, Some(0));
        assert_eq!(config.min_distance_m, Some(25.0));
        assert_eq!(config.db, Some(PathBuf::from("/tmp/wheel.db")));
        assert!(config.compact);
        assert_eq!(config.order, Some(ConfigSortOrder::Asc));
        assert_eq!(config.color, Some(ConfigColorMode::Never));
        assert_eq!(config.locale.as_deref(), Some("de"));
    }

    #[test]
    fn empty_config_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.wheel_diameter_m.is_none());
        assert!(!config.debug);
    }

    #[test]
    fn unknown_order_is_rejected() {
        assert!(toml::from_str::<Config>("order = \"sideways\"").is_err());
    }

    #[test]
    fn default_db_path_is_under_wheelstats() {
        let path = Config::default_db_path();
        assert!(path.ends_with("wheelstats/sessions.db"));
    }
}
