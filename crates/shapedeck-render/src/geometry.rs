//! Shape kind to primitive geometry dispatch.

use shapedeck_core::shape::{Dimensions, ShapeKind};

/// Segment count for curved primitives.
pub const SEGMENTS: u32 = 32;

/// Parameters of a primitive to mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32 },
    Cylinder { radius: f32, height: f32 },
    Cone { radius: f32, height: f32 },
}

impl Geometry {
    /// Fallback used for unrecognized shape kinds.
    pub const UNIT_BOX: Geometry = Geometry::Box {
        width: 1.0,
        height: 1.0,
        depth: 1.0,
    };

    /// Map a shape's kind and dimensions to primitive parameters.
    ///
    /// Curved primitives take their radius from half the width; cylinders
    /// and cones additionally take the height. Unrecognized kinds fall
    /// back to the unit box rather than erroring.
    pub fn for_shape(kind: &ShapeKind, dims: &Dimensions) -> Geometry {
        let width = dims.width as f32;
        let height = dims.height as f32;
        let depth = dims.depth as f32;
        match kind {
            ShapeKind::Cube => Geometry::Box {
                width,
                height,
                depth,
            },
            ShapeKind::Sphere => Geometry::Sphere {
                radius: width / 2.0,
            },
            ShapeKind::Cylinder => Geometry::Cylinder {
                radius: width / 2.0,
                height,
            },
            ShapeKind::Cone => Geometry::Cone {
                radius: width / 2.0,
                height,
            },
            ShapeKind::Other(_) => Geometry::UNIT_BOX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims() -> Dimensions {
        Dimensions {
            width: 4.0,
            height: 6.0,
            depth: 8.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    #[test]
    fn test_dispatch_covers_all_kinds() {
        let d = dims();
        assert_eq!(
            Geometry::for_shape(&ShapeKind::Cube, &d),
            Geometry::Box {
                width: 4.0,
                height: 6.0,
                depth: 8.0
            }
        );
        assert_eq!(
            Geometry::for_shape(&ShapeKind::Sphere, &d),
            Geometry::Sphere { radius: 2.0 }
        );
        assert_eq!(
            Geometry::for_shape(&ShapeKind::Cylinder, &d),
            Geometry::Cylinder {
                radius: 2.0,
                height: 6.0
            }
        );
        assert_eq!(
            Geometry::for_shape(&ShapeKind::Cone, &d),
            Geometry::Cone {
                radius: 2.0,
                height: 6.0
            }
        );
    }

    #[test]
    fn test_unknown_kind_falls_back_to_unit_box() {
        let kind = ShapeKind::Other("Teapot".to_string());
        assert_eq!(Geometry::for_shape(&kind, &dims()), Geometry::UNIT_BOX);
    }
}
