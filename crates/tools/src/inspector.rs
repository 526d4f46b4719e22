use cubelab_render::FlyCamera;

/// Camera inspector for developer tooling.
///
/// Read-only view of the fly camera for the debug overlay and the CLI.
pub struct CameraInspector;

impl CameraInspector {
    /// Produce a summary of the camera state.
    pub fn summary(camera: &FlyCamera) -> CameraSummary {
        let p = camera.position;
        let f = camera.front;
        CameraSummary {
            position: [p.x, p.y, p.z],
            front: [f.x, f.y, f.z],
            yaw: camera.yaw,
            pitch: camera.pitch,
            fov: camera.fov,
        }
    }
}

/// Snapshot of camera telemetry.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSummary {
    pub position: [f32; 3],
    pub front: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
}

impl std::fmt::Display for CameraSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Camera: pos=({:.2}, {:.2}, {:.2}) yaw={:.1} pitch={:.1} fov={:.1}",
            self.position[0], self.position[1], self.position[2], self.yaw, self.pitch, self.fov,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubelab_common::MovementDirection;

    #[test]
    fn summary_of_default_camera() {
        let summary = CameraInspector::summary(&FlyCamera::default());
        assert_eq!(summary.position, [0.0, 0.0, 3.0]);
        assert_eq!(summary.yaw, -90.0);
        assert_eq!(summary.pitch, 0.0);
        assert_eq!(summary.fov, 75.0);
        assert!((summary.front[2] + 1.0).abs() < 1e-5);
    }

    #[test]
    fn summary_tracks_movement() {
        let mut camera = FlyCamera::default();
        camera.keyboard_movement(MovementDirection::Up, 1.0);
        let summary = CameraInspector::summary(&camera);
        assert!(summary.position[1] > 0.0);
    }

    #[test]
    fn summary_display() {
        let s = CameraInspector::summary(&FlyCamera::default()).to_string();
        assert!(s.contains("pos=(0.00, 0.00, 3.00)"));
        assert!(s.contains("yaw=-90.0"));
        assert!(s.contains("fov=75.0"));
    }
}
