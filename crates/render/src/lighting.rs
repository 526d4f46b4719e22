use glam::Vec3;

/// Infinitely distant light, e.g. the sun.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels in (from the light towards the scene).
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

/// Positional light with distance attenuation `1 / (c + l*d + q*d^2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl PointLight {
    pub fn attenuation(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

/// The full light rig of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingDesc {
    pub directional: DirectionalLight,
    pub point: PointLight,
}

impl Default for LightingDesc {
    fn default() -> Self {
        Self {
            directional: DirectionalLight {
                direction: Vec3::new(-0.2, -1.0, -0.3),
                ambient: Vec3::splat(0.05),
                diffuse: Vec3::splat(0.4),
                specular: Vec3::splat(0.5),
            },
            point: PointLight {
                position: Vec3::new(1.2, 1.0, 2.0),
                ambient: Vec3::splat(0.05),
                diffuse: Vec3::splat(0.8),
                specular: Vec3::ONE,
                // Covers roughly 50 units.
                constant: 1.0,
                linear: 0.09,
                quadratic: 0.032,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attenuation_is_one_at_the_light() {
        let light = LightingDesc::default().point;
        assert_eq!(light.attenuation(0.0), 1.0);
    }

    #[test]
    fn attenuation_falls_off() {
        let light = LightingDesc::default().point;
        let near = light.attenuation(1.0);
        let far = light.attenuation(10.0);
        assert!(near > far);
        assert!(far > 0.0);
    }

    #[test]
    fn sun_points_down() {
        assert!(LightingDesc::default().directional.direction.y < 0.0);
    }
}
