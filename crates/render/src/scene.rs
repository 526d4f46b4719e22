use cubelab_common::SceneConfig;
use glam::{Mat4, Quat, Vec3};
use std::ops::RangeInclusive;

/// Spin speed slider range, degrees per reference frame.
pub const SPIN_SPEED_RANGE: RangeInclusive<f32> = 0.0..=10.0;
/// Range of each rotation-axis component. The lower bound keeps the axis non-zero.
pub const AXIS_RANGE: RangeInclusive<f32> = 0.01..=1.0;
/// Spin speed is expressed per frame at this rate, then scaled by the real frame delta.
pub const REFERENCE_FRAME_RATE: f32 = 60.0;

/// User-tweakable model rotation shared by every spinning draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneParams {
    pub spin: bool,
    pub spin_speed: f32,
    pub axis: Vec3,
    /// Accumulated rotation in degrees, kept in [0, 360).
    pub rotation_deg: f32,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self::from_config(&SceneConfig::default())
    }
}

impl SceneParams {
    pub fn from_config(config: &SceneConfig) -> Self {
        let mut scene = Self {
            spin: config.spin,
            spin_speed: config.spin_speed,
            axis: config.rotation_axis,
            rotation_deg: 0.0,
        };
        scene.clamp_controls();
        scene
    }

    /// Pull slider-backed values back into their ranges.
    pub fn clamp_controls(&mut self) {
        self.spin_speed = self
            .spin_speed
            .clamp(*SPIN_SPEED_RANGE.start(), *SPIN_SPEED_RANGE.end());
        self.axis = self.axis.clamp(
            Vec3::splat(*AXIS_RANGE.start()),
            Vec3::splat(*AXIS_RANGE.end()),
        );
    }

    /// Advance the spin by one frame of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        if !self.spin {
            return;
        }
        let step = self.spin_speed * REFERENCE_FRAME_RATE * dt;
        self.rotation_deg = (self.rotation_deg + step).rem_euclid(360.0);
    }

    /// Normalised rotation axis.
    pub fn rotation_axis(&self) -> Vec3 {
        self.axis.normalize_or(Vec3::Y)
    }

    /// Rotation of `extra_deg` on top of the accumulated spin, about the current axis.
    pub fn rotation_with_offset(&self, extra_deg: f32) -> Quat {
        Quat::from_axis_angle(
            self.rotation_axis(),
            (self.rotation_deg + extra_deg).to_radians(),
        )
    }

    pub fn rotation(&self) -> Quat {
        self.rotation_with_offset(0.0)
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.rotation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_spin() {
        let scene = SceneParams::default();
        assert!(scene.spin);
        assert_eq!(scene.spin_speed, 0.5);
        assert_eq!(scene.axis, Vec3::new(0.5, 1.0, 0.3));
        assert_eq!(scene.rotation_deg, 0.0);
    }

    #[test]
    fn advance_scales_with_dt() {
        let mut scene = SceneParams {
            spin_speed: 2.0,
            ..SceneParams::default()
        };
        scene.advance(1.0 / 60.0);
        assert!((scene.rotation_deg - 2.0).abs() < 1e-4);
        scene.advance(0.5);
        assert!((scene.rotation_deg - 62.0).abs() < 1e-3);
    }

    #[test]
    fn advance_wraps() {
        let mut scene = SceneParams {
            spin_speed: 10.0,
            ..SceneParams::default()
        };
        for _ in 0..100 {
            scene.advance(0.1);
            assert!((0.0..360.0).contains(&scene.rotation_deg));
        }
    }

    #[test]
    fn paused_scene_holds_rotation() {
        let mut scene = SceneParams {
            spin: false,
            rotation_deg: 45.0,
            ..SceneParams::default()
        };
        scene.advance(1.0);
        assert_eq!(scene.rotation_deg, 45.0);
    }

    #[test]
    fn controls_clamp_to_slider_ranges() {
        let config = SceneConfig {
            spin_speed: 50.0,
            rotation_axis: Vec3::new(0.0, 2.0, -1.0),
            ..SceneConfig::default()
        };
        let scene = SceneParams::from_config(&config);
        assert_eq!(scene.spin_speed, 10.0);
        assert_eq!(scene.axis, Vec3::new(0.01, 1.0, 0.01));
    }

    #[test]
    fn rotation_axis_is_unit() {
        let scene = SceneParams::default();
        assert!((scene.rotation_axis().length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn model_matrix_rotates_about_axis() {
        let scene = SceneParams {
            rotation_deg: 90.0,
            axis: Vec3::new(0.01, 1.0, 0.01),
            ..SceneParams::default()
        };
        // Points on the axis stay put.
        let on_axis = scene.rotation_axis();
        let moved = scene.model_matrix().transform_point3(on_axis);
        assert!(moved.abs_diff_eq(on_axis, 1e-5));
        // Zero rotation is the identity.
        let still = SceneParams::default();
        assert!(still.model_matrix().abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }
}
