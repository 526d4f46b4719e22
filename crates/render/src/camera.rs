use cubelab_common::{CameraConfig, MovementDirection};
use glam::{Mat4, Vec3};
use std::ops::RangeInclusive;

/// Pitch is clamped to this many degrees either side of the horizon.
pub const PITCH_LIMIT: f32 = 89.0;
/// Allowed vertical field of view, degrees.
pub const FOV_RANGE: RangeInclusive<f32> = 1.0..=120.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;

/// Last cursor coordinates consumed by mouse look, in window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorPosition {
    pub x: f32,
    pub y: f32,
}

impl CursorPosition {
    /// The centre of a window of the given size.
    pub fn centered(width: u32, height: u32) -> Self {
        Self {
            x: width as f32 / 2.0,
            y: height as f32 / 2.0,
        }
    }
}

/// First-person fly camera. Angles are in degrees.
///
/// Camera motion is frame-rate independent: every movement is scaled by the
/// frame delta. The camera never rolls; `up` stays fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub sensitivity: f32,
    pub move_speed: f32,
    first_mouse: bool,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            front: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            // A yaw of 0 looks down +X; -90 turns the camera to look down -Z.
            yaw: -90.0,
            pitch: 0.0,
            fov: 75.0,
            sensitivity: 0.1,
            move_speed: 2.5,
            first_mouse: true,
        }
    }
}

/// Unit forward vector for the given yaw and pitch (degrees).
pub fn front_from_angles(yaw: f32, pitch: f32) -> Vec3 {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize()
}

impl FlyCamera {
    pub fn from_config(config: &CameraConfig) -> Self {
        let pitch = config.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        Self {
            position: config.position,
            front: front_from_angles(config.yaw, pitch),
            yaw: config.yaw,
            pitch,
            fov: config.fov.clamp(*FOV_RANGE.start(), *FOV_RANGE.end()),
            sensitivity: config.sensitivity,
            move_speed: config.move_speed,
            ..Self::default()
        }
    }

    /// Unit vector pointing to the camera's left.
    pub fn left(&self) -> Vec3 {
        self.up.cross(self.front).normalize_or_zero()
    }

    /// Move `move_speed * dt` along one of the six basis directions.
    pub fn keyboard_movement(&mut self, direction: MovementDirection, dt: f32) {
        let velocity = self.move_speed * dt;
        let offset = match direction {
            MovementDirection::Forward => self.front,
            MovementDirection::Backward => -self.front,
            MovementDirection::Left => self.left(),
            MovementDirection::Right => -self.left(),
            MovementDirection::Up => self.up,
            MovementDirection::Down => -self.up,
        };
        self.position += offset * velocity;
    }

    /// Turn the camera by the cursor travel since `last`, then store `(x, y)` in `last`.
    ///
    /// The first call after construction (or after [`FlyCamera::reseed_mouse`])
    /// only seeds `last` and leaves the orientation untouched.
    pub fn mouse_movement(&mut self, last: &mut CursorPosition, x: f32, y: f32) {
        if self.first_mouse {
            *last = CursorPosition { x, y };
            self.first_mouse = false;
        }

        // Screen y grows downward, pitch grows upward.
        let x_offset = (x - last.x) * self.sensitivity;
        let y_offset = (last.y - y) * self.sensitivity;
        *last = CursorPosition { x, y };

        self.yaw += x_offset;
        self.pitch = (self.pitch + y_offset).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.front = front_from_angles(self.yaw, self.pitch);
    }

    /// Make the next mouse event seed the cursor anchor instead of turning.
    pub fn reseed_mouse(&mut self) {
        self.first_mouse = true;
    }

    pub fn awaiting_first_mouse(&self) -> bool {
        self.first_mouse
    }

    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov.clamp(*FOV_RANGE.start(), *FOV_RANGE.end());
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}
