//! Global calgrid configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CalGridError, CalGridResult};
use crate::layout::holidays::HolidayTable;
use crate::layout::range::WeekStart;

static DEFAULT_DATA_DIR: &str = "~/calendar/calgrid";
pub const DEFAULT_PORT: u16 = 3001;

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_show_holidays() -> bool {
    true
}

/// Configuration at ~/.config/calgrid/config.toml, overridable with
/// `CALGRID_*` environment variables (e.g. `CALGRID_PORT=4000`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalgridConfig {
    /// Directory holding one .ics file per event.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL the CLI talks to, including the `/api` prefix.
    /// Derived from `port` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    #[serde(default = "default_show_holidays")]
    pub show_holidays: bool,

    #[serde(default)]
    pub week_start: WeekStart,

    /// TOML holiday table replacing the bundled one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holidays_file: Option<PathBuf>,
}

impl Default for CalgridConfig {
    fn default() -> Self {
        CalgridConfig {
            data_dir: default_data_dir(),
            port: default_port(),
            server_url: None,
            show_holidays: default_show_holidays(),
            week_start: WeekStart::default(),
            holidays_file: None,
        }
    }
}

impl CalgridConfig {
    pub fn config_path() -> CalGridResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalGridError::Config("Could not determine config directory".into()))?
            .join("calgrid");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented default file on first run.
    pub fn load() -> CalGridResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (which may be missing) layered with `CALGRID_*` variables.
    pub fn load_from(path: &Path) -> CalGridResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("CALGRID").try_parsing(true))
            .build()
            .map_err(|e| CalGridError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalGridError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalGridResult<()> {
        let contents = format!(
            "\
# calgrid configuration

# Where event files live:
# data_dir = \"{DEFAULT_DATA_DIR}\"

# Port calgrid-server listens on:
# port = {DEFAULT_PORT}

# API base URL used by the calgrid CLI (defaults to the local server on `port`):
# server_url = \"http://127.0.0.1:{DEFAULT_PORT}/api\"

# Show holidays in month/week/day views:
# show_holidays = true

# First day of the week (sunday or monday):
# week_start = \"sunday\"

# Replace the bundled holiday table with your own:
# holidays_file = \"~/.config/calgrid/holidays.toml\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalGridError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalGridError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// `server_url` without a trailing slash, or the local server on `port`.
    pub fn api_url(&self) -> String {
        match &self.server_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://127.0.0.1:{}/api", self.port),
        }
    }

    /// `data_dir` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        expand(&self.data_dir)
    }

    /// The configured holiday table, or the bundled one.
    pub fn holiday_table(&self) -> CalGridResult<HolidayTable> {
        match &self.holidays_file {
            Some(path) => HolidayTable::load(&expand(path)),
            None => Ok(HolidayTable::builtin()),
        }
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
