//! Sandbox configuration loaded from a JSON file.
//!
//! Every field is optional: a partial file is merged over the defaults and a
//! missing file yields the defaults.

use crate::types::{PipelinePreset, TextureKey};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/cubelab.json";

/// Errors from loading or saving the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubelabConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub scene: SceneConfig,
    pub assets: AssetsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial inner width in physical pixels.
    pub width: u32,
    /// Initial inner height in physical pixels.
    pub height: u32,
    pub title: String,
    /// Present with vertical sync (Fifo) instead of immediate mode.
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "cubelab".into(),
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    /// Degrees. -90 looks down -Z.
    pub yaw: f32,
    /// Degrees, clamped to [-89, 89].
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Degrees of rotation per pixel of cursor travel.
    pub sensitivity: f32,
    /// World units per second.
    pub move_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            yaw: -90.0,
            pitch: 0.0,
            fov: 75.0,
            sensitivity: 0.1,
            move_speed: 2.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub pipeline: PipelinePreset,
    pub spin: bool,
    /// Degrees per 60 Hz frame.
    pub spin_speed: f32,
    pub rotation_axis: Vec3,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelinePreset::Textured,
            spin: true,
            spin_speed: 0.5,
            rotation_axis: Vec3::new(0.5, 1.0, 0.3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Root directory for every relative asset path below.
    pub root: PathBuf,
    pub shader_dir: PathBuf,
    pub container_texture: PathBuf,
    pub face_texture: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            shader_dir: PathBuf::from("shaders"),
            container_texture: PathBuf::from("textures/container.jpg"),
            face_texture: PathBuf::from("textures/awesomeface.png"),
        }
    }
}

impl AssetsConfig {
    pub fn shader_dir(&self) -> PathBuf {
        self.root.join(&self.shader_dir)
    }

    pub fn texture_path(&self, key: TextureKey) -> PathBuf {
        match key {
            TextureKey::Container => self.root.join(&self.container_texture),
            TextureKey::Face => self.root.join(&self.face_texture),
        }
    }
}

impl CubelabConfig {
    /// Load configuration from `path`, or the defaults if the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the configuration as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("saved config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_sandbox_startup() {
        let config = CubelabConfig::default();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.camera.position, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(config.camera.yaw, -90.0);
        assert_eq!(config.camera.fov, 75.0);
        assert_eq!(config.scene.pipeline, PipelinePreset::Textured);
        assert!(config.scene.spin);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = CubelabConfig::from_json(
            r#"{ "scene": { "pipeline": "lit", "spin_speed": 2.0 }, "camera": { "fov": 60.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.scene.pipeline, PipelinePreset::Lit);
        assert_eq!(config.scene.spin_speed, 2.0);
        assert!(config.scene.spin);
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.camera.move_speed, 2.5);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CubelabConfig::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, CubelabConfig::default());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let err = CubelabConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cubelab.json");
        let mut config = CubelabConfig::default();
        config.scene.pipeline = PipelinePreset::Field;
        config.camera.position = Vec3::new(1.0, 2.0, 3.0);
        config.save(&path).unwrap();

        let loaded = CubelabConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let config = CubelabConfig::from_json(include_str!("../../../config/cubelab.json")).unwrap();
        assert_eq!(config, CubelabConfig::default());
    }

    #[test]
    fn asset_paths_join_root() {
        let assets = AssetsConfig::default();
        assert_eq!(
            assets.texture_path(TextureKey::Container),
            PathBuf::from("assets/textures/container.jpg")
        );
        assert_eq!(assets.shader_dir(), PathBuf::from("assets/shaders"));
    }
}
