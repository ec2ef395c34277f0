//! Draft editing state for the dimension editor.

use crate::shape::Shape;

/// The six editable numeric fields of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionField {
    Width,
    Height,
    Depth,
    X,
    Y,
    Z,
}

impl DimensionField {
    /// All fields in editor display order.
    pub const ALL: [DimensionField; 6] = [
        DimensionField::Width,
        DimensionField::Height,
        DimensionField::Depth,
        DimensionField::X,
        DimensionField::Y,
        DimensionField::Z,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DimensionField::Width => "Width",
            DimensionField::Height => "Height",
            DimensionField::Depth => "Depth",
            DimensionField::X => "X Position",
            DimensionField::Y => "Y Position",
            DimensionField::Z => "Z Position",
        }
    }
}

/// An owned, uncommitted copy of a shape under active editing.
///
/// The draft never aliases the store's record: edits stay local until
/// [`take`](Self::take) hands the edited shape to `ShapeStore::update`.
/// Discarding the draft discards the edits.
#[derive(Debug, Clone)]
pub struct ShapeDraft {
    shape: Shape,
    /// Bumped on every accepted edit so the preview knows to rebuild.
    revision: u64,
}

impl ShapeDraft {
    /// Start editing a copy of `shape`.
    pub fn new(shape: Shape) -> Self {
        Self { shape, revision: 0 }
    }

    /// The draft's current state.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Counter identifying the draft's edit state; changes iff an edit
    /// was accepted.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Current value of one field.
    pub fn field(&self, field: DimensionField) -> f64 {
        let d = &self.shape.dimensions;
        match field {
            DimensionField::Width => d.width,
            DimensionField::Height => d.height,
            DimensionField::Depth => d.depth,
            DimensionField::X => d.x,
            DimensionField::Y => d.y,
            DimensionField::Z => d.z,
        }
    }

    /// Parse `input` and replace one field of the draft.
    ///
    /// Unparseable or non-finite input is rejected: the field keeps its
    /// last valid value and false is returned so the editor can flag the
    /// text box. Values are otherwise unbounded; the preview clamps
    /// positions at staging time.
    pub fn set_field(&mut self, field: DimensionField, input: &str) -> bool {
        let value = match input.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => return false,
        };

        let d = &mut self.shape.dimensions;
        let slot = match field {
            DimensionField::Width => &mut d.width,
            DimensionField::Height => &mut d.height,
            DimensionField::Depth => &mut d.depth,
            DimensionField::X => &mut d.x,
            DimensionField::Y => &mut d.y,
            DimensionField::Z => &mut d.z,
        };
        if *slot != value {
            *slot = value;
            self.revision += 1;
        }
        true
    }

    /// Consume the draft, yielding the edited shape for the store.
    pub fn take(self) -> Shape {
        self.shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Dimensions, ShapeKind};

    fn draft() -> ShapeDraft {
        ShapeDraft::new(Shape {
            id: 1,
            name: "Shape-1".to_string(),
            kind: ShapeKind::Cube,
            dimensions: Dimensions::default(),
        })
    }

    #[test]
    fn test_set_field_parses_and_replaces_single_field() {
        let mut d = draft();

        assert!(d.set_field(DimensionField::Width, "4.5"));
        assert!(d.set_field(DimensionField::X, " -7 "));

        assert_eq!(d.shape().dimensions.width, 4.5);
        assert_eq!(d.shape().dimensions.x, -7.0);
        // Untouched fields keep their defaults.
        assert_eq!(d.shape().dimensions.height, 2.0);
    }

    #[test]
    fn test_malformed_input_keeps_last_value() {
        let mut d = draft();
        d.set_field(DimensionField::Height, "6");

        assert!(!d.set_field(DimensionField::Height, "six"));
        assert!(!d.set_field(DimensionField::Height, ""));
        assert!(!d.set_field(DimensionField::Height, "NaN"));
        assert!(!d.set_field(DimensionField::Height, "inf"));

        assert_eq!(d.shape().dimensions.height, 6.0);
    }

    #[test]
    fn test_revision_tracks_accepted_edits_only() {
        let mut d = draft();
        let r0 = d.revision();

        d.set_field(DimensionField::Z, "3");
        assert_ne!(d.revision(), r0);

        let r1 = d.revision();
        d.set_field(DimensionField::Z, "bogus");
        // Same value again is not an edit either.
        d.set_field(DimensionField::Z, "3");
        assert_eq!(d.revision(), r1);
    }

    #[test]
    fn test_draft_does_not_alias_the_source() {
        let committed = Shape {
            id: 9,
            name: "Kept".to_string(),
            kind: ShapeKind::Cone,
            dimensions: Dimensions::default(),
        };
        let mut d = ShapeDraft::new(committed.clone());
        d.set_field(DimensionField::Depth, "12");

        assert_eq!(committed.dimensions.depth, 3.0);
        assert_eq!(d.take().dimensions.depth, 12.0);
    }
}
