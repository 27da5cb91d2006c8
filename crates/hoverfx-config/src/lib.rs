//! Configuration for hoverfx.
//!
//! Settings live in a TOML file under the platform config directory
//! (`~/.config/hoverfx/config.toml` on Linux). Every field is optional; a
//! missing file means all defaults.

mod error;

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use hoverfx_core::{AnimationSpeed, Rgb};
use serde::{Deserialize, Serialize};

pub use error::ConfigError;

const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "hoverfx.log";

/// Inclusive millisecond range used for randomized delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsRange {
    pub min: u64,
    pub max: u64,
}

impl MsRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub cosmos: CosmosConfig,
    pub ticker: TickerConfig,
    pub links: LinksConfig,
    pub logging: LoggingConfig,
}

/// Frame pacing and page colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Target redraw rate.
    pub fps: u32,
    pub speed: AnimationSpeed,
    /// Page background behind the animations.
    pub background: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            speed: AnimationSpeed::Medium,
            background: "#07070f".to_string(),
        }
    }
}

/// Particle counts and meteor timing for the cosmos effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CosmosConfig {
    pub noise_count: usize,
    pub dark_nebula_count: usize,
    pub dust_count: usize,
    pub star_count_min: usize,
    pub star_count_max: usize,
    pub foreground_count: usize,
    /// Probability that two nearby stars at similar depth get linked.
    pub connection_chance: f32,
    pub first_meteor_delay_ms: MsRange,
    pub meteor_delay_ms: MsRange,
}

impl Default for CosmosConfig {
    fn default() -> Self {
        Self {
            noise_count: 800,
            dark_nebula_count: 15,
            dust_count: 600,
            star_count_min: 150,
            star_count_max: 224,
            foreground_count: 5,
            connection_chance: 0.15,
            first_meteor_delay_ms: MsRange::new(2000, 5000),
            meteor_delay_ms: MsRange::new(3000, 8000),
        }
    }
}

/// Timing and appearance of the stock ticker effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Time for the line to sweep from left to right.
    pub sweep_ms: u64,
    /// Interval between new trend lines.
    pub pump_ms: u64,
    pub readout_refresh_ms: u64,
    pub segments: usize,
    pub readout_min: usize,
    pub readout_max: usize,
    pub code_snippets: usize,
    pub typewriter_char_ms: u64,
    pub fade_out_ms: u64,
    pub gain_color: String,
    pub loss_color: String,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            sweep_ms: 1500,
            pump_ms: 1500,
            readout_refresh_ms: 400,
            segments: 20,
            readout_min: 14,
            readout_max: 18,
            code_snippets: 3,
            typewriter_char_ms: 45,
            fade_out_ms: 300,
            gain_color: "#e74c3c".to_string(),
            loss_color: "#2ecc71".to_string(),
        }
    }
}

/// Labels of the navigation links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    pub work: String,
    pub mind: String,
    pub about: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            work: "work".to_string(),
            mind: "mind".to_string(),
            about: "about".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Log file; defaults to the platform data directory.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// tried and a missing file yields the defaults. Returns the path that
    /// was actually read, if any.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                path.to_path_buf()
            }
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => {
                    tracing::debug!("no config file found, using defaults");
                    return Ok((Self::default(), None));
                }
            },
        };

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml_str(&text).map_err(|err| err.at(&path))?;
        Ok((config, Some(path)))
    }

    /// Check value ranges and color syntax.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=240).contains(&self.display.fps) {
            return Err(ConfigError::Invalid(format!(
                "display.fps must be between 1 and 240, got {}",
                self.display.fps
            )));
        }
        parse_color("display.background", &self.display.background)?;
        parse_color("ticker.gain_color", &self.ticker.gain_color)?;
        parse_color("ticker.loss_color", &self.ticker.loss_color)?;

        let cosmos = &self.cosmos;
        if cosmos.star_count_min > cosmos.star_count_max {
            return Err(ConfigError::Invalid(
                "cosmos.star_count_min is greater than cosmos.star_count_max".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&cosmos.connection_chance) {
            return Err(ConfigError::Invalid(
                "cosmos.connection_chance must be within 0.0..=1.0".to_string(),
            ));
        }
        check_range("cosmos.first_meteor_delay_ms", cosmos.first_meteor_delay_ms)?;
        check_range("cosmos.meteor_delay_ms", cosmos.meteor_delay_ms)?;

        let ticker = &self.ticker;
        if ticker.readout_min > ticker.readout_max {
            return Err(ConfigError::Invalid(
                "ticker.readout_min is greater than ticker.readout_max".to_string(),
            ));
        }
        if ticker.segments == 0 {
            return Err(ConfigError::Invalid(
                "ticker.segments must be at least 1".to_string(),
            ));
        }
        if ticker.sweep_ms == 0 || ticker.pump_ms == 0 {
            return Err(ConfigError::Invalid(
                "ticker.sweep_ms and ticker.pump_ms must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn background(&self) -> Rgb {
        Rgb::from_hex(&self.display.background).unwrap_or_default()
    }

    pub fn gain_color(&self) -> Rgb {
        Rgb::from_hex(&self.ticker.gain_color).unwrap_or(Rgb::new(0xe7, 0x4c, 0x3c))
    }

    pub fn loss_color(&self) -> Rgb {
        Rgb::from_hex(&self.ticker.loss_color).unwrap_or(Rgb::new(0x2e, 0xcc, 0x71))
    }

    /// Log file from config, falling back to the data directory.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.logging.file.clone().or_else(default_log_path)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "hoverfx")
}

/// Default config file location.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Default log file location.
pub fn default_log_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_local_dir().join(LOG_FILE))
}

fn parse_color(field: &str, value: &str) -> Result<Rgb, ConfigError> {
    Rgb::from_hex(value).ok_or_else(|| {
        ConfigError::Invalid(format!("{field} must be a #rrggbb color, got '{value}'"))
    })
}

fn check_range(field: &str, range: MsRange) -> Result<(), ConfigError> {
    if range.min > range.max {
        return Err(ConfigError::Invalid(format!(
            "{field}: min ({}) is greater than max ({})",
            range.min, range.max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.cosmos.noise_count, 800);
        assert_eq!(config.ticker.sweep_ms, 1500);
        assert_eq!(config.gain_color(), Rgb::new(0xe7, 0x4c, 0x3c));
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml_str(
            r#"
            [display]
            fps = 60
            speed = "fast"

            [cosmos]
            dust_count = 10
            meteor_delay_ms = { min = 100, max = 200 }

            [links]
            mind = "thoughts"
            "#,
        )
        .unwrap();
        assert_eq!(config.display.fps, 60);
        assert_eq!(config.display.speed, AnimationSpeed::Fast);
        assert_eq!(config.display.background, "#07070f");
        assert_eq!(config.cosmos.dust_count, 10);
        assert_eq!(config.cosmos.noise_count, 800);
        assert_eq!(config.cosmos.meteor_delay_ms, MsRange::new(100, 200));
        assert_eq!(config.links.mind, "thoughts");
        assert_eq!(config.links.work, "work");
    }

    #[test]
    fn test_validation_errors() {
        let bad_fps = Config::from_toml_str("[display]\nfps = 0");
        assert!(matches!(bad_fps, Err(ConfigError::Invalid(_))));

        let bad_color = Config::from_toml_str("[ticker]\ngain_color = \"red\"");
        assert!(matches!(bad_color, Err(ConfigError::Invalid(_))));

        let bad_range =
            Config::from_toml_str("[cosmos]\nmeteor_delay_ms = { min = 10, max = 1 }");
        assert!(matches!(bad_range, Err(ConfigError::Invalid(_))));

        let bad_stars = Config::from_toml_str("[cosmos]\nstar_count_min = 300");
        assert!(matches!(bad_stars, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_toml() {
        let result = Config::from_toml_str("[display\nfps = 1");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_explicit_missing_file() {
        let path = Path::new("/definitely/not/here/hoverfx.toml");
        let result = Config::load(Some(path));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = std::env::temp_dir().join(format!("hoverfx-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[ticker]\nsweep_ms = 900\n").unwrap();

        let (config, used) = Config::load(Some(&path)).unwrap();
        assert_eq!(config.ticker.sweep_ms, 900);
        assert_eq!(used.as_deref(), Some(path.as_path()));

        std::fs::write(&path, "[display]\nfps = 999\n").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("config.toml"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
