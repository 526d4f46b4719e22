use bytemuck::{Pod, Zeroable};

/// Interleaved vertex: position, normal, texture coordinate.
///
/// Texture coordinates use a bottom-left origin; images are flipped on load to match.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// CPU-side mesh. `indices` is empty for meshes drawn as a plain triangle list.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    /// Number of vertices the draw call consumes.
    pub fn draw_count(&self) -> u32 {
        if self.is_indexed() {
            self.indices.len() as u32
        } else {
            self.vertices.len() as u32
        }
    }
}

type V3 = [f32; 3];

/// (normal, u axis, v axis) per face, with u x v = normal so triangles wind counter-clockwise.
#[rustfmt::skip]
const CUBE_FACES: [(V3, V3, V3); 6] = [
    ([ 0.0,  0.0,  1.0], [ 1.0, 0.0,  0.0], [0.0, 1.0,  0.0]), // +Z
    ([ 0.0,  0.0, -1.0], [-1.0, 0.0,  0.0], [0.0, 1.0,  0.0]), // -Z
    ([ 1.0,  0.0,  0.0], [ 0.0, 0.0, -1.0], [0.0, 1.0,  0.0]), // +X
    ([-1.0,  0.0,  0.0], [ 0.0, 0.0,  1.0], [0.0, 1.0,  0.0]), // -X
    ([ 0.0,  1.0,  0.0], [ 1.0, 0.0,  0.0], [0.0, 0.0, -1.0]), // +Y
    ([ 0.0, -1.0,  0.0], [ 1.0, 0.0,  0.0], [0.0, 0.0,  1.0]), // -Y
];

/// Corner order of the two triangles of a face, in (s, t) face coordinates.
const FACE_CORNERS: [(f32, f32); 6] = [
    (0.0, 0.0),
    (1.0, 0.0),
    (1.0, 1.0),
    (1.0, 1.0),
    (0.0, 1.0),
    (0.0, 0.0),
];

fn face_point(normal: V3, u: V3, v: V3, s: f32, t: f32) -> V3 {
    let mut p = [0.0; 3];
    for i in 0..3 {
        p[i] = normal[i] * 0.5 + u[i] * (s - 0.5) + v[i] * (t - 0.5);
    }
    p
}

/// Unit cube centred on the origin: 36 vertices, no index buffer.
pub fn cube() -> MeshData {
    let mut vertices = Vec::with_capacity(36);
    for (normal, u, v) in CUBE_FACES {
        for (s, t) in FACE_CORNERS {
            vertices.push(Vertex {
                position: face_point(normal, u, v, s, t),
                normal,
                uv: [s, t],
            });
        }
    }
    MeshData {
        vertices,
        indices: Vec::new(),
    }
}

/// Unit quad in the XZ plane facing +Y: 4 vertices, 6 indices.
pub fn plane() -> MeshData {
    let normal = [0.0, 1.0, 0.0];
    #[rustfmt::skip]
    let vertices = vec![
        Vertex { position: [-0.5, 0.0,  0.5], normal, uv: [0.0, 0.0] },
        Vertex { position: [ 0.5, 0.0,  0.5], normal, uv: [1.0, 0.0] },
        Vertex { position: [ 0.5, 0.0, -0.5], normal, uv: [1.0, 1.0] },
        Vertex { position: [-0.5, 0.0, -0.5], normal, uv: [0.0, 1.0] },
    ];
    MeshData {
        vertices,
        indices: vec![0, 1, 2, 2, 3, 0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(a: V3, b: V3) -> V3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: V3, b: V3) -> V3 {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn dot(a: V3, b: V3) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    fn assert_ccw(a: &Vertex, b: &Vertex, c: &Vertex) {
        let n = cross(sub(b.position, a.position), sub(c.position, a.position));
        assert!(dot(n, a.normal) > 0.0, "triangle winds against its normal");
    }

    #[test]
    fn cube_has_36_unindexed_vertices() {
        let cube = cube();
        assert_eq!(cube.vertices.len(), 36);
        assert!(!cube.is_indexed());
        assert_eq!(cube.draw_count(), 36);
    }

    #[test]
    fn cube_vertices_lie_on_unit_cube() {
        for v in cube().vertices {
            for c in v.position {
                assert!((-0.5..=0.5).contains(&c));
            }
            let len = dot(v.normal, v.normal).sqrt();
            assert!((len - 1.0).abs() < 1e-6);
            // Every vertex sits on the face its normal points out of.
            assert!((dot(v.position, v.normal) - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn cube_triangles_wind_outward() {
        let cube = cube();
        for tri in cube.vertices.chunks(3) {
            assert_ccw(&tri[0], &tri[1], &tri[2]);
        }
    }

    #[test]
    fn cube_uvs_span_each_face() {
        for face in cube().vertices.chunks(6) {
            assert!(face.iter().any(|v| v.uv == [0.0, 0.0]));
            assert!(face.iter().any(|v| v.uv == [1.0, 1.0]));
        }
    }

    #[test]
    fn plane_is_indexed_and_in_range() {
        let plane = plane();
        assert!(plane.is_indexed());
        assert_eq!(plane.draw_count(), 6);
        assert!(plane.indices.iter().all(|&i| (i as usize) < plane.vertices.len()));
        for tri in plane.indices.chunks(3) {
            let v = &plane.vertices;
            assert_ccw(&v[tri[0] as usize], &v[tri[1] as usize], &v[tri[2] as usize]);
        }
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }
}
