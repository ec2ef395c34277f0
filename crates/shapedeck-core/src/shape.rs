//! Shape record model.

use serde::{Deserialize, Serialize};

/// The kind of primitive a shape renders as.
///
/// The UI only ever offers the four named kinds; `Other` exists so that a
/// persisted record with an unrecognized type string still loads and can be
/// rendered with the fallback geometry instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShapeKind {
    Cube,
    Sphere,
    Cylinder,
    Cone,
    Other(String),
}

impl ShapeKind {
    /// The kinds selectable in the creation form, in display order.
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Cube,
        ShapeKind::Sphere,
        ShapeKind::Cylinder,
        ShapeKind::Cone,
    ];

    /// Display label (also the persisted type string).
    pub fn label(&self) -> &str {
        match self {
            ShapeKind::Cube => "Cube",
            ShapeKind::Sphere => "Sphere",
            ShapeKind::Cylinder => "Cylinder",
            ShapeKind::Cone => "Cone",
            ShapeKind::Other(s) => s,
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for ShapeKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Cube" => ShapeKind::Cube,
            "Sphere" => ShapeKind::Sphere,
            "Cylinder" => ShapeKind::Cylinder,
            "Cone" => ShapeKind::Cone,
            _ => ShapeKind::Other(s),
        }
    }
}

impl From<ShapeKind> for String {
    fn from(kind: ShapeKind) -> Self {
        kind.label().to_string()
    }
}

/// Size and position of a shape.
///
/// `width`/`height`/`depth` parameterize the geometry; `x`/`y`/`z` place it
/// in the preview. Values are unbounded in the store; the preview clamps
/// positions into its viewing volume at staging time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 2.0,
            depth: 3.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

impl Dimensions {
    /// Table summary in "width x height x depth" form.
    pub fn summary(&self) -> String {
        format!("{} x {} x {}", self.width, self.height, self.depth)
    }
}

/// A catalog entry: the persisted unit of data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Unique within the store; assigned once at creation, never reused.
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub dimensions: Dimensions,
}

/// Caller-supplied fields for a new shape; the store fills in the rest.
#[derive(Debug, Clone)]
pub struct NewShape {
    /// Blank (or whitespace-only) names get the `Shape-<id>` default.
    pub name: String,
    pub kind: ShapeKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_type_string() {
        for kind in ShapeKind::ALL {
            let s = String::from(kind.clone());
            assert_eq!(ShapeKind::from(s), kind);
        }
    }

    #[test]
    fn unknown_kind_is_preserved_not_rejected() {
        let kind = ShapeKind::from("Torus".to_string());
        assert_eq!(kind, ShapeKind::Other("Torus".to_string()));
        assert_eq!(kind.label(), "Torus");
    }

    #[test]
    fn shape_serializes_kind_under_type_key() {
        let shape = Shape {
            id: 1,
            name: "Shape-1".to_string(),
            kind: ShapeKind::Sphere,
            dimensions: Dimensions::default(),
        };
        let json = serde_json::to_value(&shape).unwrap();
        assert_eq!(json["type"], "Sphere");
        assert_eq!(json["dimensions"]["width"], 1.0);

        let back: Shape = serde_json::from_value(json).unwrap();
        assert_eq!(back, shape);
    }

    #[test]
    fn default_dimensions_match_creation_defaults() {
        let d = Dimensions::default();
        assert_eq!((d.width, d.height, d.depth), (1.0, 2.0, 3.0));
        assert_eq!((d.x, d.y, d.z), (0.0, 0.0, 0.0));
        assert_eq!(d.summary(), "1 x 2 x 3");
    }
}
