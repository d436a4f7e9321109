//! Drawing configuration
//!
//! The configuration is fixed policy: it is read once at startup and then
//! passed by reference into the capture session and the synthesizer.

use crate::error::{ConfigError, SettingsResult};
use flatdraw_core::{MotionParameters, RobotSetup, WorkspaceSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Motion sink execution policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionSettings {
    /// Give up on a batch after this many milliseconds (unset = wait forever)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Total attempts per batch, including the first
    pub max_attempts: u32,
    /// Delay between attempts in milliseconds
    pub retry_delay_ms: u64,
}

impl ExecutionSettings {
    /// Timeout as a duration, if configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Retry delay as a duration
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            max_attempts: 1,
            retry_delay_ms: 500,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Workspace bounds and capture tolerances
    #[serde(default)]
    pub workspace: WorkspaceSettings,
    /// Motion policy for synthesized programs
    #[serde(default)]
    pub motion: MotionParameters,
    /// Robot connection and tooling context
    #[serde(default)]
    pub robot: RobotSetup,
    /// Sink execution policy
    #[serde(default)]
    pub execution: ExecutionSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform configuration directory for FlatDraw
    pub fn config_dir() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("flatdraw"))
            .ok_or_else(|| ConfigError::NoConfigDir(std::env::consts::OS.into()).into())
    }

    /// Default configuration file path
    pub fn default_path() -> SettingsResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load config from file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!(
                "No configuration at {}, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ws = &self.workspace;
        if !ws.bounds.is_valid() {
            return Err(ConfigError::out_of_range(
                "workspace.bounds",
                format!(
                    "[{}, {}] x [{}, {}]",
                    ws.bounds.min_x, ws.bounds.max_x, ws.bounds.min_y, ws.bounds.max_y
                ),
            ));
        }
        positive("workspace.end_tolerance_mm", ws.end_tolerance_mm)?;
        non_negative("workspace.tool_radius_mm", ws.tool_radius_mm)?;

        let m = &self.motion;
        non_negative("motion.hover_height_m", m.hover_height_m)?;
        non_negative("motion.extra_offset_m", m.extra_offset_m)?;
        positive("motion.linear_speed", m.linear_speed)?;
        positive("motion.linear_accel", m.linear_accel)?;
        positive("motion.joint_speed", m.joint_speed)?;
        positive("motion.joint_accel", m.joint_accel)?;
        positive("motion.approach_accel_scale", m.approach_accel_scale)?;
        positive("motion.blend_radius_m", m.blend_radius_m)?;
        non_negative("motion.dwell_secs", m.dwell_secs)?;
        if m.dwell_secs > MotionParameters::MAX_DWELL_SECS {
            return Err(ConfigError::out_of_range("motion.dwell_secs", m.dwell_secs));
        }
        if let Some(angle) = m.home_joint_deg.iter().find(|a| !a.is_finite()) {
            return Err(ConfigError::out_of_range("motion.home_joint_deg", angle));
        }

        if self.execution.max_attempts == 0 {
            return Err(ConfigError::out_of_range("execution.max_attempts", 0));
        }
        if self.execution.timeout_ms == Some(0) {
            return Err(ConfigError::out_of_range("execution.timeout_ms", 0));
        }

        Ok(())
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnknownExtension(
                other.unwrap_or("").to_string(),
            )),
        }
    }
}

fn positive(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::out_of_range(key, value))
    }
}

fn non_negative(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::out_of_range(key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.workspace.end_tolerance_mm, 2.0);
        assert_eq!(config.motion.hover_height_m, 0.010);
        assert_eq!(config.robot.script_name, "draw_in_2D");
        assert_eq!(config.execution.timeout(), None);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = Config::default();
        config.workspace.end_tolerance_mm = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { ref key, .. }) if key == "workspace.end_tolerance_mm"
        ));

        let mut config = Config::default();
        config.motion.linear_speed = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.workspace.bounds.min_x = 500.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.execution.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_huge_dwell() {
        let mut config = Config::default();
        config.motion.dwell_secs = 1e30;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { ref key, .. }) if key == "motion.dwell_secs"
        ));

        config.motion.dwell_secs = MotionParameters::MAX_DWELL_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = Config::default()
            .save_to_file(Path::new("config.yaml"))
            .unwrap_err();
        assert!(err.to_string().contains("yaml"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [workspace]
            tool_radius_mm = 5.0
            end_tolerance_mm = 3.0
            [workspace.bounds]
            min_x = 0.0
            max_x = 200.0
            min_y = 0.0
            max_y = 100.0
            "#,
        )
        .expect("parse");
        assert_eq!(config.workspace.end_tolerance_mm, 3.0);
        assert_eq!(config.workspace.bounds.max_y, 100.0);
        assert_eq!(config.motion, MotionParameters::default());
        assert!(config.validate().is_ok());
    }
}
