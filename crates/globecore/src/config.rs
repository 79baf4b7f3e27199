use crate::appearance::AppearanceMode;
use crate::constants::*;
use crate::textures::{TextureEntry, TextureManifest};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "globe_config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write config: {0}")]
    Write(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub rotation: RotationConfig,
    pub scene: SceneConfig,
    pub camera: CameraConfig,
    pub pollution: PollutionConfig,
    pub destruction: DestructionConfig,
    pub appearance: AppearanceConfig,
    pub assets: AssetConfig,
    pub startup: StartupConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Fixed per-frame angular increments, in radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    pub earth_speed: f32,
    pub moon_speed: f32,
    pub earth_tilt_deg: f32,
    pub moon_tilt_deg: f32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            earth_speed: EARTH_ROTATION_SPEED,
            moon_speed: MOON_ROTATION_SPEED,
            earth_tilt_deg: EARTH_TILT_DEG,
            moon_tilt_deg: MOON_TILT_DEG,
        }
    }
}

impl RotationConfig {
    pub fn earth_tilt(&self) -> f32 {
        self.earth_tilt_deg.to_radians()
    }

    pub fn moon_tilt(&self) -> f32 {
        self.moon_tilt_deg.to_radians()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub camera_position: [f32; 3],
    pub earth_radius: f32,
    pub atmosphere_radius: f32,
    pub moon_radius: f32,
    pub moon_distance: f32,
    pub sphere_segments: u32,
    pub star_count: usize,
    pub star_min_radius: f32,
    pub star_radius_span: f32,
    /// Fixed seed for the starfield; a fresh one is drawn each session when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub star_seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fov_deg: 45.0,
            near: 0.1,
            far: 1000.0,
            camera_position: [0.0, 5.0, 15.0],
            earth_radius: EARTH_RADIUS,
            atmosphere_radius: ATMOSPHERE_RADIUS,
            moon_radius: MOON_RADIUS,
            moon_distance: MOON_DISTANCE,
            sphere_segments: SPHERE_SEGMENTS,
            star_count: STAR_COUNT,
            star_min_radius: STAR_MIN_RADIUS,
            star_radius_span: STAR_RADIUS_SPAN,
            star_seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputProfile {
    /// Decide from the host (user agent on the web, desktop natively)
    #[default]
    Auto,
    Desktop,
    Mobile,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputSensitivity {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub enable_pan: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar limits as fractions of PI
    pub min_polar_fraction: f32,
    pub max_polar_fraction: f32,
    pub damping_factor: f32,
    pub input_profile: InputProfile,
    pub desktop: InputSensitivity,
    pub mobile: InputSensitivity,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_distance: 4.0,
            max_distance: 30.0,
            min_polar_fraction: 0.1,
            max_polar_fraction: 0.9,
            damping_factor: 0.05,
            input_profile: InputProfile::Auto,
            desktop: InputSensitivity {
                rotate_speed: 0.8,
                zoom_speed: 1.0,
                enable_pan: true,
            },
            mobile: InputSensitivity {
                rotate_speed: 0.5,
                zoom_speed: 0.5,
                enable_pan: false,
            },
        }
    }
}

impl CameraConfig {
    pub fn sensitivity(&self, mobile: bool) -> InputSensitivity {
        if mobile { self.mobile } else { self.desktop }
    }

    pub fn polar_range(&self) -> (f32, f32) {
        (
            std::f32::consts::PI * self.min_polar_fraction,
            std::f32::consts::PI * self.max_polar_fraction,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollutionConfig {
    pub poll_interval_secs: f32,
    pub default_level: f32,
    pub storage_key: String,
    pub instability_threshold: f32,
    pub tilt_slope: f32,
    pub tremor_slope: f32,
}

impl Default for PollutionConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 2.0,
            default_level: DEFAULT_POLLUTION,
            storage_key: POLLUTION_STORAGE_KEY.to_string(),
            instability_threshold: INSTABILITY_THRESHOLD,
            tilt_slope: INSTABILITY_TILT_SLOPE,
            tremor_slope: INSTABILITY_TREMOR_SLOPE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DestructionConfig {
    pub threshold: f32,
    pub duration_ms: f64,
    pub reset_level: f32,
    pub shake_base: f32,
    pub shake_growth: f32,
    pub spin_boost: f32,
}

impl Default for DestructionConfig {
    fn default() -> Self {
        Self {
            threshold: DESTRUCTION_THRESHOLD,
            duration_ms: DESTRUCTION_DURATION_MS,
            reset_level: DESTRUCTION_RESET_LEVEL,
            shake_base: SHAKE_BASE,
            shake_growth: SHAKE_GROWTH,
            spin_boost: DESTRUCTION_SPIN_BOOST,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    pub mode: AppearanceMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub texture_root: String,
    pub textures: Vec<TextureEntry>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            texture_root: "textures".to_string(),
            textures: TextureManifest::default().entries().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupConfig {
    /// Time given to the host page to inject its web-app object before the handshake
    pub handshake_delay_secs: f32,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            handshake_delay_secs: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "globe_storage.toml".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            filter: "wgpu=error,naga=warn".to_string(),
        }
    }
}

impl GlobeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Self::from_toml_str(&content)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(ConfigError::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = GlobeConfig::default();
        config.scene.star_seed = Some(42);
        config.appearance.mode = AppearanceMode::Baseline;

        let text = config.to_toml_string().unwrap();
        let parsed = GlobeConfig::from_toml_str(&text).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed = GlobeConfig::from_toml_str(
            r#"
            [camera]
            max_distance = 50.0

            [pollution]
            poll_interval_secs = 5.0
            "#,
        )
        .unwrap();

        assert_eq!(parsed.camera.max_distance, 50.0);
        assert_eq!(parsed.camera.min_distance, 4.0);
        assert_eq!(parsed.pollution.poll_interval_secs, 5.0);
        assert_eq!(parsed.pollution.storage_key, "earthPollution");
        assert_eq!(parsed.rotation, RotationConfig::default());
        assert_eq!(parsed.assets.textures.len(), 7);
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let result = GlobeConfig::from_toml_str("[camera\nmax_distance = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let result = GlobeConfig::load_from_file("definitely/not/here/globe_config.toml");
        assert!(matches!(result, Err(ConfigError::Read(_))));
    }

    #[test]
    fn test_polar_range_in_radians() {
        let (min, max) = CameraConfig::default().polar_range();
        assert!((min - std::f32::consts::PI * 0.1).abs() < 1e-6);
        assert!((max - std::f32::consts::PI * 0.9).abs() < 1e-6);
    }
}
