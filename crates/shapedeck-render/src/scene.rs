//! Preview scene staging: which meshes to draw, where, and how they spin.

use crate::geometry::Geometry;
use glam::{Mat4, Vec3};
use shapedeck_core::shape::Shape;

/// Per-axis bounds shapes are clamped into before rendering.
#[derive(Debug, Clone, Copy)]
pub struct ViewVolume {
    pub x: (f32, f32),
    pub y: (f32, f32),
    pub z: (f32, f32),
}

impl ViewVolume {
    /// Clamp each axis independently into its range.
    pub fn clamp(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            p.x.clamp(self.x.0, self.x.1),
            p.y.clamp(self.y.0, self.y.1),
            p.z.clamp(self.z.0, self.z.1),
        )
    }
}

/// The fixed viewing volume of the preview.
pub const VIEW_VOLUME: ViewVolume = ViewVolume {
    x: (-10.0, 10.0),
    y: (-5.0, 5.0),
    z: (-5.0, 5.0),
};

/// X-axis spacing between shapes in all-shapes mode.
pub const ROW_SPACING: f32 = 5.0;

/// Rotation increment per frame, applied to both the x and y axes.
pub const ROTATION_STEP: f32 = 0.01;

/// One mesh staged for drawing.
#[derive(Debug, Clone)]
pub struct StagedShape {
    pub geometry: Geometry,
    pub position: Vec3,
    /// Accumulated rotation angles around the x and y axes, radians.
    pub rot_x: f32,
    pub rot_y: f32,
}

impl StagedShape {
    fn new(shape: &Shape, x_offset: f32) -> Self {
        let d = &shape.dimensions;
        let clamped = VIEW_VOLUME.clamp(Vec3::new(d.x as f32, d.y as f32, d.z as f32));
        Self {
            geometry: Geometry::for_shape(&shape.kind, d),
            position: Vec3::new(x_offset + clamped.x, clamped.y, clamped.z),
            rot_x: 0.0,
            rot_y: 0.0,
        }
    }

    /// Model matrix: place at `position`, spin around the mesh's own
    /// origin.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_x(self.rot_x)
            * Mat4::from_rotation_y(self.rot_y)
    }
}

/// Fixed camera on the z axis, matching the preview's framing.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub eye: Vec3,
    pub fov_y: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 10.0),
            fov_y: 75_f32.to_radians(),
            z_near: 0.1,
            z_far: 1000.0,
        }
    }
}

impl Camera {
    /// Combined view-projection matrix for a viewport aspect ratio.
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y, aspect, self.z_near, self.z_far);
        let view = Mat4::look_at_rh(self.eye, Vec3::ZERO, Vec3::Y);
        proj * view
    }
}

/// Fixed white point light.
#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub position: Vec3,
    pub color: [f32; 3],
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(10.0, 10.0, 10.0),
            color: [1.0, 1.0, 1.0],
        }
    }
}

/// A transient scene: staged meshes plus the fixed camera and light.
///
/// Scenes are rebuilt wholesale whenever their inputs change; the renderer
/// releases the previous scene's GPU resources on every rebuild.
#[derive(Debug, Clone)]
pub struct PreviewScene {
    pub staged: Vec<StagedShape>,
    pub camera: Camera,
    pub light: PointLight,
}

impl PreviewScene {
    /// Single-shape mode: exactly one mesh at the shape's clamped
    /// coordinates.
    pub fn single(shape: &Shape) -> Self {
        Self {
            staged: vec![StagedShape::new(shape, 0.0)],
            camera: Camera::default(),
            light: PointLight::default(),
        }
    }

    /// All-shapes mode: one mesh per record, spaced `index * 5` along x
    /// so shapes do not overlap.
    pub fn all(shapes: &[Shape]) -> Self {
        Self {
            staged: shapes
                .iter()
                .enumerate()
                .map(|(index, shape)| StagedShape::new(shape, index as f32 * ROW_SPACING))
                .collect(),
            camera: Camera::default(),
            light: PointLight::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Advance every mesh's rotation by one frame step.
    pub fn advance(&mut self) {
        for staged in &mut self.staged {
            staged.rot_x += ROTATION_STEP;
            staged.rot_y += ROTATION_STEP;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapedeck_core::shape::{Dimensions, ShapeKind};

    fn shape_at(x: f64, y: f64, z: f64) -> Shape {
        Shape {
            id: 1,
            name: "Shape-1".to_string(),
            kind: ShapeKind::Cube,
            dimensions: Dimensions {
                x,
                y,
                z,
                ..Dimensions::default()
            },
        }
    }

    #[test]
    fn test_positions_clamp_into_view_volume() {
        let scene = PreviewScene::single(&shape_at(100.0, -100.0, 7.5));
        let p = scene.staged[0].position;
        assert_eq!(p, Vec3::new(10.0, -5.0, 5.0));

        let scene = PreviewScene::single(&shape_at(-100.0, 2.0, -6.0));
        let p = scene.staged[0].position;
        assert_eq!(p, Vec3::new(-10.0, 2.0, -5.0));
    }

    #[test]
    fn test_in_range_positions_pass_through() {
        let scene = PreviewScene::single(&shape_at(3.0, -1.5, 4.0));
        assert_eq!(scene.staged[0].position, Vec3::new(3.0, -1.5, 4.0));
    }

    #[test]
    fn test_all_mode_offsets_by_row_spacing() {
        let shapes = vec![shape_at(0.0, 0.0, 0.0); 3];
        let scene = PreviewScene::all(&shapes);

        let xs: Vec<f32> = scene.staged.iter().map(|s| s.position.x).collect();
        assert_eq!(xs, vec![0.0, 5.0, 10.0]);
    }

    #[test]
    fn test_all_mode_offset_adds_to_clamped_x() {
        // The record's own x clamps first; the row offset then applies.
        let shapes = vec![shape_at(100.0, 0.0, 0.0), shape_at(100.0, 0.0, 0.0)];
        let scene = PreviewScene::all(&shapes);

        assert_eq!(scene.staged[0].position.x, 10.0);
        assert_eq!(scene.staged[1].position.x, 15.0);
    }

    #[test]
    fn test_scene_stages_one_mesh_per_record() {
        let shapes = vec![shape_at(0.0, 0.0, 0.0); 4];
        assert_eq!(PreviewScene::all(&shapes).len(), 4);
        assert_eq!(PreviewScene::single(&shapes[0]).len(), 1);
        assert!(PreviewScene::all(&[]).is_empty());
    }

    #[test]
    fn test_advance_applies_fixed_step_to_both_axes() {
        let mut scene = PreviewScene::all(&vec![shape_at(0.0, 0.0, 0.0); 2]);
        scene.advance();
        scene.advance();

        for staged in &scene.staged {
            assert!((staged.rot_x - 2.0 * ROTATION_STEP).abs() < 1e-6);
            assert!((staged.rot_y - 2.0 * ROTATION_STEP).abs() < 1e-6);
        }
    }

    #[test]
    fn test_rebuilt_scene_starts_fresh() {
        let shapes = vec![shape_at(0.0, 0.0, 0.0)];
        let mut scene = PreviewScene::all(&shapes);
        scene.advance();

        let rebuilt = PreviewScene::all(&shapes);
        assert_eq!(rebuilt.len(), 1);
        assert_eq!(rebuilt.staged[0].rot_x, 0.0);
    }

    #[test]
    fn test_model_matrix_translates_to_position() {
        let scene = PreviewScene::single(&shape_at(3.0, 1.0, -2.0));
        let m = scene.staged[0].model_matrix();
        let origin = m.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(3.0, 1.0, -2.0)).length() < 1e-6);
    }
}
