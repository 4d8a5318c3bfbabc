use std::path::PathBuf;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "JOBS_DASHBOARD";
pub const DATA_PATH_VAR: &str = "JOBS_DASHBOARD_DATA";

pub const DEFAULT_DATA_PATH: &str = "wuzzuf_jobs.xlsx";
pub const DEFAULT_TOP_CITIES: usize = 10;

/// Runtime settings, read from `JOBS_DASHBOARD_*` environment variables.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Spreadsheet loaded on startup, relative to the working directory.
    #[serde(rename = "data")]
    pub data_path: PathBuf,
    /// Number of slices in the city pie chart.
    pub top_cities: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            top_cities: DEFAULT_TOP_CITIES,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::with_prefix(ENV_PREFIX))
    }

    /// Layer `env` over the defaults. A blank path or an unusable
    /// `top_cities` falls back to its default.
    pub fn from_source(env: Environment) -> Result<Self, ConfigError> {
        let conf = Config::builder()
            .set_default("data", DEFAULT_DATA_PATH)?
            .set_default("top_cities", DEFAULT_TOP_CITIES as i64)?
            .add_source(env)
            .build()?;

        let data = conf.get_string("data")?;
        let mut s = match conf.clone().try_deserialize::<DashboardConfig>() {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Ignoring {ENV_PREFIX}_TOP_CITIES ({e}), using {DEFAULT_TOP_CITIES}");
                DashboardConfig {
                    data_path: PathBuf::from(&data),
                    top_cities: DEFAULT_TOP_CITIES,
                }
            }
        };

        let trimmed = data.trim();
        s.data_path = if trimmed.is_empty() {
            PathBuf::from(DEFAULT_DATA_PATH)
        } else {
            PathBuf::from(trimmed)
        };
        if s.top_cities == 0 {
            log::warn!("{ENV_PREFIX}_TOP_CITIES must be positive, using {DEFAULT_TOP_CITIES}");
            s.top_cities = DEFAULT_TOP_CITIES;
        }
        Ok(s)
    }
}
