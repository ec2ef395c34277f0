//! CPU-side triangle meshes for the primitive geometries.

use crate::geometry::{Geometry, SEGMENTS};
use bytemuck::{Pod, Zeroable};
use std::f32::consts::{PI, TAU};

/// Position and normal of a vertex in a mesh.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// CPU-side data of a triangle mesh, ready for upload.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Tessellate a primitive.
    pub fn from_geometry(geometry: &Geometry) -> Self {
        match *geometry {
            Geometry::Box {
                width,
                height,
                depth,
            } => box_mesh(width, height, depth),
            Geometry::Sphere { radius } => sphere_mesh(radius, SEGMENTS),
            Geometry::Cylinder { radius, height } => cylinder_mesh(radius, height, SEGMENTS),
            Geometry::Cone { radius, height } => cone_mesh(radius, height, SEGMENTS),
        }
    }

    fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3]) {
        let base = self.vertices.len() as u32;
        for position in corners {
            self.vertices.push(Vertex { position, normal });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

/// Axis-aligned box centered at the origin, four vertices per face so each
/// face gets a flat normal.
fn box_mesh(width: f32, height: f32, depth: f32) -> MeshData {
    let (hw, hh, hd) = (width / 2.0, height / 2.0, depth / 2.0);
    let mut mesh = MeshData::default();

    // +x
    mesh.push_quad(
        [
            [hw, -hh, -hd],
            [hw, hh, -hd],
            [hw, hh, hd],
            [hw, -hh, hd],
        ],
        [1.0, 0.0, 0.0],
    );
    // -x
    mesh.push_quad(
        [
            [-hw, -hh, hd],
            [-hw, hh, hd],
            [-hw, hh, -hd],
            [-hw, -hh, -hd],
        ],
        [-1.0, 0.0, 0.0],
    );
    // +y
    mesh.push_quad(
        [
            [-hw, hh, -hd],
            [-hw, hh, hd],
            [hw, hh, hd],
            [hw, hh, -hd],
        ],
        [0.0, 1.0, 0.0],
    );
    // -y
    mesh.push_quad(
        [
            [-hw, -hh, hd],
            [-hw, -hh, -hd],
            [hw, -hh, -hd],
            [hw, -hh, hd],
        ],
        [0.0, -1.0, 0.0],
    );
    // +z
    mesh.push_quad(
        [
            [-hw, -hh, hd],
            [hw, -hh, hd],
            [hw, hh, hd],
            [-hw, hh, hd],
        ],
        [0.0, 0.0, 1.0],
    );
    // -z
    mesh.push_quad(
        [
            [hw, -hh, -hd],
            [-hw, -hh, -hd],
            [-hw, hh, -hd],
            [hw, hh, -hd],
        ],
        [0.0, 0.0, -1.0],
    );

    mesh
}

/// UV sphere centered at the origin. `segments` rings from pole to pole
/// and `segments` sectors around the y axis.
fn sphere_mesh(radius: f32, segments: u32) -> MeshData {
    let rings = segments;
    let sectors = segments;
    let mut mesh = MeshData::default();

    for ring in 0..=rings {
        // phi sweeps from the north pole down
        let phi = PI * ring as f32 / rings as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for sector in 0..=sectors {
            let theta = TAU * sector as f32 / sectors as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let n = [sin_phi * cos_theta, cos_phi, sin_phi * sin_theta];
            mesh.vertices.push(Vertex {
                position: [n[0] * radius, n[1] * radius, n[2] * radius],
                normal: n,
            });
        }
    }

    let stride = sectors + 1;
    for ring in 0..rings {
        for sector in 0..sectors {
            let a = ring * stride + sector;
            let b = a + stride;
            mesh.indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    mesh
}

/// Cylinder centered at the origin with its axis along y: a side wall with
/// radial normals plus two flat caps.
fn cylinder_mesh(radius: f32, height: f32, segments: u32) -> MeshData {
    let hh = height / 2.0;
    let mut mesh = MeshData::default();

    // Side wall: bottom/top vertex pairs sharing radial normals.
    for i in 0..=segments {
        let theta = TAU * i as f32 / segments as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        let normal = [cos_theta, 0.0, sin_theta];
        let (px, pz) = (radius * cos_theta, radius * sin_theta);
        mesh.vertices.push(Vertex {
            position: [px, -hh, pz],
            normal,
        });
        mesh.vertices.push(Vertex {
            position: [px, hh, pz],
            normal,
        });
    }
    for i in 0..segments {
        let a = i * 2;
        mesh.indices
            .extend_from_slice(&[a, a + 1, a + 2, a + 2, a + 1, a + 3]);
    }

    cap_fan(&mut mesh, radius, hh, segments, 1.0);
    cap_fan(&mut mesh, radius, -hh, segments, -1.0);

    mesh
}

/// Cone with its base at -height/2 and apex at +height/2: a slanted side
/// wall (the apex vertex is duplicated per segment so every facet gets its
/// own averaged normal) plus a flat base cap.
fn cone_mesh(radius: f32, height: f32, segments: u32) -> MeshData {
    let hh = height / 2.0;
    let mut mesh = MeshData::default();

    // Slant normal: perpendicular to the surface line from rim to apex.
    let slant_len = (height * height + radius * radius).sqrt();
    let (ny, nr) = if slant_len > 0.0 {
        (radius / slant_len, height / slant_len)
    } else {
        (0.0, 1.0)
    };

    let rim_normal = |theta: f32| {
        let (sin_theta, cos_theta) = theta.sin_cos();
        [nr * cos_theta, ny, nr * sin_theta]
    };

    // Rim vertices.
    for i in 0..=segments {
        let theta = TAU * i as f32 / segments as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        mesh.vertices.push(Vertex {
            position: [radius * cos_theta, -hh, radius * sin_theta],
            normal: rim_normal(theta),
        });
    }
    // One apex vertex per segment, normal taken at the facet midpoint.
    let apex_base = mesh.vertices.len() as u32;
    for i in 0..segments {
        let mid_theta = TAU * (i as f32 + 0.5) / segments as f32;
        mesh.vertices.push(Vertex {
            position: [0.0, hh, 0.0],
            normal: rim_normal(mid_theta),
        });
    }
    for i in 0..segments {
        mesh.indices
            .extend_from_slice(&[i, apex_base + i, i + 1]);
    }

    cap_fan(&mut mesh, radius, -hh, segments, -1.0);

    mesh
}

/// Flat circular cap at height `y`, facing along `direction` (±1 on y).
fn cap_fan(mesh: &mut MeshData, radius: f32, y: f32, segments: u32, direction: f32) {
    let normal = [0.0, direction, 0.0];
    let center = mesh.vertices.len() as u32;
    mesh.vertices.push(Vertex {
        position: [0.0, y, 0.0],
        normal,
    });
    for i in 0..=segments {
        let theta = TAU * i as f32 / segments as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        mesh.vertices.push(Vertex {
            position: [radius * cos_theta, y, radius * sin_theta],
            normal,
        });
    }
    for i in 0..segments {
        let a = center + 1 + i;
        if direction > 0.0 {
            mesh.indices.extend_from_slice(&[center, a + 1, a]);
        } else {
            mesh.indices.extend_from_slice(&[center, a, a + 1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(mesh: &MeshData) {
        assert_eq!(mesh.indices.len() % 3, 0);
        let max = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < max));
        for v in &mesh.vertices {
            let len2: f32 = v.normal.iter().map(|c| c * c).sum();
            assert!((len2 - 1.0).abs() < 1e-4, "non-unit normal {:?}", v.normal);
        }
    }

    #[test]
    fn test_box_mesh_counts_and_extents() {
        let mesh = box_mesh(2.0, 4.0, 6.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_well_formed(&mesh);

        for v in &mesh.vertices {
            assert!(v.position[0].abs() <= 1.0);
            assert!(v.position[1].abs() <= 2.0);
            assert!(v.position[2].abs() <= 3.0);
        }
    }

    #[test]
    fn test_sphere_mesh_counts_and_radius() {
        let mesh = sphere_mesh(2.0, SEGMENTS);
        let stride = SEGMENTS + 1;
        assert_eq!(mesh.vertices.len(), (stride * stride) as usize);
        assert_eq!(mesh.indices.len(), (SEGMENTS * SEGMENTS * 6) as usize);
        assert_well_formed(&mesh);

        for v in &mesh.vertices {
            let r: f32 = v.position.iter().map(|c| c * c).sum::<f32>().sqrt();
            assert!((r - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_cylinder_mesh_counts() {
        let mesh = cylinder_mesh(1.0, 3.0, SEGMENTS);
        let side = (SEGMENTS + 1) * 2;
        let cap = SEGMENTS + 2;
        assert_eq!(mesh.vertices.len(), (side + 2 * cap) as usize);
        assert_eq!(mesh.indices.len(), (SEGMENTS * 6 + 2 * SEGMENTS * 3) as usize);
        assert_well_formed(&mesh);
    }

    #[test]
    fn test_cone_mesh_counts_and_apex() {
        let mesh = cone_mesh(1.0, 2.0, SEGMENTS);
        let side = SEGMENTS + 1 + SEGMENTS;
        let cap = SEGMENTS + 2;
        assert_eq!(mesh.vertices.len(), (side + cap) as usize);
        assert_eq!(mesh.indices.len(), (SEGMENTS * 3 * 2) as usize);
        assert_well_formed(&mesh);

        let apex_count = mesh
            .vertices
            .iter()
            .filter(|v| v.position == [0.0, 1.0, 0.0])
            .count();
        assert_eq!(apex_count, SEGMENTS as usize);
    }

    #[test]
    fn test_from_geometry_dispatch() {
        let unit = MeshData::from_geometry(&Geometry::UNIT_BOX);
        assert_eq!(unit.vertices.len(), 24);

        let sphere = MeshData::from_geometry(&Geometry::Sphere { radius: 1.0 });
        assert!(sphere.vertices.len() > unit.vertices.len());
    }
}
