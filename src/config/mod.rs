use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_REGION: &str = "Malta";
pub const DEFAULT_NUM_POINTS: usize = 100;
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

const USER_AGENT: &str = concat!("landpoints/", env!("CARGO_PKG_VERSION"));

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}
fn default_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_verbose() -> bool {
    false
}

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub num_points: Option<usize>,
    /// Fixed RNG seed for reproducible runs; entropy-seeded when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Cap on the number of points sent to the routing API
    #[serde(default)]
    pub max_points: Option<usize>,
    /// Points echoed to the console after generation
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    /// Replacement fallback outline as [lon, lat] pairs
    #[serde(default)]
    pub fallback: Option<Vec<[f64; 2]>>,
    #[serde(default)]
    pub nominatim: NominatimConfig,
    #[serde(default)]
    pub table: TableConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            num_points: None,
            seed: None,
            max_points: None,
            sample_size: default_sample_size(),
            output_dir: default_output_dir(),
            verbose: default_verbose(),
            fallback: None,
            nominatim: NominatimConfig::default(),
            table: TableConfig::default(),
        }
    }
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_nominatim_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    USER_AGENT.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct NominatimConfig {
    #[serde(default = "default_nominatim_url")]
    pub url: String,
    #[serde(default = "default_nominatim_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            url: default_nominatim_url(),
            timeout_secs: default_nominatim_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_table_url() -> String {
    "http://127.0.0.1:5002/table/v1/driving/".to_string()
}

fn default_table_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize, Clone)]
pub struct TableConfig {
    #[serde(default = "default_table_url")]
    pub url: String,
    #[serde(default = "default_table_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            url: default_table_url(),
            timeout_secs: default_table_timeout_secs(),
        }
    }
}

impl FileConfig {
    /// Load the first parseable config file from the search paths
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Fallback outline as (lon, lat) pairs, if one is configured
    pub fn fallback_ring(&self) -> Option<Vec<(f64, f64)>> {
        self.fallback
            .as_ref()
            .filter(|ring| ring.len() >= 3)
            .map(|ring| ring.iter().map(|&[lon, lat]| (lon, lat)).collect())
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("landpoints.toml"));
    paths.push(PathBuf::from(".landpoints.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("landpoints").join("config.toml"));
        paths.push(config_dir.join("landpoints.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".landpoints.toml"));
        paths.push(home.join(".config").join("landpoints").join("config.toml"));
    }

    paths
}
