use crate::frame::FramePlan;
use glam::Vec3;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer consumes a resolved [`FramePlan`]; it never mutates camera or
/// scene state.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, plan: &FramePlan) -> Self::Output;
}

/// Text renderer: describes a frame plan instead of drawing it.
///
/// Used by the CLI and by tests to inspect what the GPU backend would draw.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, plan: &FramePlan) -> String {
        let mut out = String::new();
        let [r, g, b, a] = plan.clear_color;
        out.push_str(&format!(
            "=== Pipeline '{}' ({} passes, {} instances) ===\n",
            plan.preset,
            plan.draws.len(),
            plan.instance_count()
        ));
        out.push_str(&format!("Clear: ({r:.2}, {g:.2}, {b:.2}, {a:.2})\n"));
        let [x, y, z, _] = plan.frame.eye;
        out.push_str(&format!("Eye: ({x:.2}, {y:.2}, {z:.2})\n"));

        for (draw, range) in plan.draws.iter().zip(plan.instance_ranges()) {
            out.push_str(&format!(
                "  [{}] mesh={:?} shading={:?} base={} overlay={} instances={}..{}\n",
                draw.label,
                draw.mesh,
                draw.shading,
                draw.material.base.name(),
                draw.material.overlay.map(|k| k.name()).unwrap_or("-"),
                range.start,
                range.end
            ));
            for model in &draw.models {
                let p = model.transform_point3(Vec3::ZERO);
                out.push_str(&format!("    pos=({:.2}, {:.2}, {:.2})\n", p.x, p.y, p.z));
            }
        }

        out
    }
}
