use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::{DISTANCE_MATRIX_URL, TravelMode};
use crate::batch::{DEFAULT_BATCH_SIZE, MAX_BATCH_SIZE};

/// Corners (lat, lon) of the default survey area, a quadrilateral near
/// Cape May, NJ.
pub const DEFAULT_CORNERS: [(f64, f64); 4] = [
    (38.663332, -74.919915),
    (38.522134, -74.945856),
    (38.600000, -75.000000),
    (38.700000, -74.980000),
];

fn default_pairs() -> usize {
    50
}
fn default_output() -> PathBuf {
    PathBuf::from("distance_results.csv")
}
fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
fn default_max_attempts() -> u32 {
    10_000
}
fn default_corners() -> Vec<(f64, f64)> {
    DEFAULT_CORNERS.to_vec()
}
fn default_endpoint() -> String {
    DISTANCE_MATRIX_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_pairs")]
    pub pairs: usize,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Polygon corners as `[lat, lon]` arrays
    #[serde(default = "default_corners")]
    pub corners: Vec<(f64, f64)>,
    #[serde(default)]
    pub mode: TravelMode,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// 0 disables the request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub verbose: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            pairs: default_pairs(),
            output: default_output(),
            batch_size: default_batch_size(),
            max_attempts: default_max_attempts(),
            seed: None,
            corners: default_corners(),
            mode: TravelMode::default(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            verbose: false,
        }
    }
}

impl FileConfig {
    /// Load an explicitly requested config file; it must exist and parse
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config file not found: {}", path.display());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// First parseable config file from the search path, if any
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("drivetimes.toml"));
    paths.push(PathBuf::from(".drivetimes.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("drivetimes").join("config.toml"));
        paths.push(config_dir.join("drivetimes.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".drivetimes.toml"));
    }

    paths
}

/// Values given on the command line; `None` falls back to the file config
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub pairs: Option<usize>,
    pub output: Option<PathBuf>,
    pub batch_size: Option<usize>,
    pub max_attempts: Option<u32>,
    pub seed: Option<u64>,
    pub corners: Vec<(f64, f64)>,
    pub mode: Option<TravelMode>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub verbose: bool,
    pub dry_run: bool,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Always present unless `dry_run`
    pub api_key: Option<String>,
    pub pairs: usize,
    pub output: PathBuf,
    pub batch_size: NonZeroUsize,
    pub max_attempts: u32,
    pub seed: Option<u64>,
    pub corners: Vec<(f64, f64)>,
    pub mode: TravelMode,
    pub endpoint: String,
    pub timeout: Option<Duration>,
    pub verbose: bool,
    pub dry_run: bool,
}

impl RunConfig {
    pub fn resolve(overrides: Overrides, file: FileConfig) -> Result<Self> {
        let api_key = overrides
            .api_key
            .or(file.api_key)
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() && !overrides.dry_run {
            bail!(
                "Missing API key: pass --api-key, set GOOGLE_MAPS_API_KEY, or add api_key to the config file"
            );
        }

        let batch_size = overrides.batch_size.unwrap_or(file.batch_size);
        if batch_size > MAX_BATCH_SIZE {
            bail!(
                "Batch size {} exceeds the Distance Matrix limit of {}",
                batch_size,
                MAX_BATCH_SIZE
            );
        }
        let batch_size = NonZeroUsize::new(batch_size)
            .context("Batch size must be at least 1")?;

        let max_attempts = overrides.max_attempts.unwrap_or(file.max_attempts);
        if max_attempts == 0 {
            bail!("max_attempts must be at least 1");
        }

        let corners = if overrides.corners.is_empty() {
            file.corners
        } else {
            overrides.corners
        };
        if corners.len() < 3 {
            bail!("A polygon needs at least 3 corners, got {}", corners.len());
        }

        let timeout_secs = overrides.timeout_secs.unwrap_or(file.timeout_secs);

        Ok(Self {
            api_key,
            pairs: overrides.pairs.unwrap_or(file.pairs),
            output: overrides.output.unwrap_or(file.output),
            batch_size,
            max_attempts,
            seed: overrides.seed.or(file.seed),
            corners,
            mode: overrides.mode.unwrap_or(file.mode),
            endpoint: overrides.endpoint.unwrap_or(file.endpoint),
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            verbose: overrides.verbose || file.verbose,
            dry_run: overrides.dry_run,
        })
    }
}

/// Parse a `LAT,LON` corner argument
pub fn parse_corner(s: &str) -> Result<(f64, f64), String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got '{s}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude '{}': {e}", lat.trim()))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude '{}': {e}", lon.trim()))?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {lat} out of range"));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("longitude {lon} out of range"));
    }
    Ok((lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key() -> Overrides {
        Overrides {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_file_config() {
        let toml = r#"
            api_key = "abc"
            pairs = 12
            output = "out.csv"
            batch_size = 5
            seed = 7
            mode = "walking"
            timeout_secs = 0
            corners = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0]]
        "#;
        let file: FileConfig = toml::from_str(toml).unwrap();
        assert_eq!(file.pairs, 12);
        assert_eq!(file.corners.len(), 3);
        assert_eq!(file.mode, TravelMode::Walking);

        let config = RunConfig::resolve(Overrides::default(), file).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.batch_size.get(), 5);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.output, PathBuf::from("out.csv"));
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file: FileConfig = toml::from_str("").unwrap();
        let config = RunConfig::resolve(with_key(), file).unwrap();

        assert_eq!(config.pairs, 50);
        assert_eq!(config.batch_size.get(), 10);
        assert_eq!(config.corners, DEFAULT_CORNERS.to_vec());
        assert_eq!(config.output, PathBuf::from("distance_results.csv"));
        assert_eq!(config.mode, TravelMode::Driving);
        assert_eq!(config.endpoint, DISTANCE_MATRIX_URL);
        assert_eq!(config.timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(toml::from_str::<FileConfig>("pairz = 3").is_err());
    }

    #[test]
    fn test_overrides_win() {
        let file = FileConfig {
            api_key: Some("file-key".to_string()),
            pairs: 5,
            ..Default::default()
        };
        let overrides = Overrides {
            api_key: Some("cli-key".to_string()),
            pairs: Some(0),
            corners: vec![(0.0, 0.0), (0.0, 1.0), (1.0, 0.0)],
            ..Default::default()
        };

        let config = RunConfig::resolve(overrides, file).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("cli-key"));
        assert_eq!(config.pairs, 0);
        assert_eq!(config.corners.len(), 3);
    }

    #[test]
    fn test_missing_key() {
        assert!(RunConfig::resolve(Overrides::default(), FileConfig::default()).is_err());

        let dry = Overrides {
            dry_run: true,
            ..Default::default()
        };
        assert!(RunConfig::resolve(dry, FileConfig::default()).is_ok());
    }

    #[test]
    fn test_batch_size_bounds() {
        let zero = Overrides {
            batch_size: Some(0),
            ..with_key()
        };
        assert!(RunConfig::resolve(zero, FileConfig::default()).is_err());

        let too_big = Overrides {
            batch_size: Some(26),
            ..with_key()
        };
        assert!(RunConfig::resolve(too_big, FileConfig::default()).is_err());
    }

    #[test]
    fn test_parse_corner() {
        assert_eq!(parse_corner("38.6,-74.9"), Ok((38.6, -74.9)));
        assert_eq!(parse_corner(" 1.5 , 2 "), Ok((1.5, 2.0)));
        assert!(parse_corner("38.6").is_err());
        assert!(parse_corner("abc,1").is_err());
        assert!(parse_corner("91,0").is_err());
    }
}
