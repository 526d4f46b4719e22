use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the six fixed camera movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MovementDirection {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl MovementDirection {
    pub const ALL: [MovementDirection; 6] = [
        MovementDirection::Forward,
        MovementDirection::Backward,
        MovementDirection::Left,
        MovementDirection::Right,
        MovementDirection::Up,
        MovementDirection::Down,
    ];

    /// The direction that undoes this one.
    pub fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

/// Named textures the sandbox knows how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureKey {
    /// Wooden crate, the base colour of every cube.
    Container,
    /// Smiley with an alpha channel, blended over the crate.
    Face,
}

impl TextureKey {
    pub const ALL: [TextureKey; 2] = [TextureKey::Container, TextureKey::Face];

    pub fn name(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Face => "face",
        }
    }
}

/// The built-in render pipeline descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelinePreset {
    /// One spinning textured cube, no lighting.
    #[default]
    Textured,
    /// One spinning textured quad drawn through an index buffer.
    Quad,
    /// A lit cube on a lit floor with a lamp marking the point light.
    Lit,
    /// Ten lit cubes at fixed positions, each with its own rotation offset.
    Field,
}

impl PipelinePreset {
    pub const ALL: [PipelinePreset; 4] = [
        PipelinePreset::Textured,
        PipelinePreset::Quad,
        PipelinePreset::Lit,
        PipelinePreset::Field,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Textured => "textured",
            Self::Quad => "quad",
            Self::Lit => "lit",
            Self::Field => "field",
        }
    }
}

impl fmt::Display for PipelinePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown preset name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pipeline preset '{0}' (expected textured, quad, lit or field)")]
pub struct UnknownPreset(pub String);

impl FromStr for PipelinePreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Model matrix: scale, then rotate, then translate.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}
