//! The shape store: authoritative collection plus its durable mirror.

use crate::shape::{Dimensions, NewShape, Shape};
use crate::storage::Storage;
use serde::{Deserialize, Serialize};

/// Fixed storage key holding the whole collection.
pub const STORE_KEY: &str = "shapes";

/// Persisted layout: the full collection plus the id counter.
#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    next_id: u64,
    shapes: Vec<Shape>,
}

/// Owns the shape collection and mirrors it to a [`Storage`] backend.
///
/// The collection is loaded once at startup; every mutation rewrites the
/// entire persisted document. Ids come from a monotonic counter that is
/// itself persisted, so interleaved deletes and creates can never hand out
/// a duplicate id.
pub struct ShapeStore {
    shapes: Vec<Shape>,
    next_id: u64,
    storage: Box<dyn Storage>,
}

impl ShapeStore {
    /// Open a store over the given backend, loading any persisted state.
    ///
    /// A missing key, an unreadable backend, or unparseable content all
    /// yield an empty store. Parse failure is "no data", not an error.
    pub fn open(storage: Box<dyn Storage>) -> Self {
        let (shapes, next_id) = match storage.get(STORE_KEY) {
            Ok(Some(json)) => parse_document(&json),
            Ok(None) => (Vec::new(), 1),
            Err(e) => {
                log::warn!("Failed to read persisted shapes, starting empty: {}", e);
                (Vec::new(), 1)
            }
        };

        log::info!("Loaded {} shape(s)", shapes.len());

        Self {
            shapes,
            next_id,
            storage,
        }
    }

    /// Current records in insertion order.
    pub fn list(&self) -> &[Shape] {
        &self.shapes
    }

    /// Look up a record by id.
    pub fn get(&self, id: u64) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Create a record from the form's fields and persist the collection.
    ///
    /// Blank names get the `Shape-<id>` default; dimensions start at the
    /// creation defaults.
    pub fn create(&mut self, new: NewShape) -> Shape {
        let id = self.next_id;
        self.next_id += 1;

        let name = if new.name.trim().is_empty() {
            format!("Shape-{}", id)
        } else {
            new.name
        };

        let shape = Shape {
            id,
            name,
            kind: new.kind,
            dimensions: Dimensions::default(),
        };
        self.shapes.push(shape.clone());
        self.flush();
        shape
    }

    /// Replace the record with a matching id and persist.
    ///
    /// Returns false without persisting if no record matches.
    pub fn update(&mut self, shape: Shape) -> bool {
        match self.shapes.iter_mut().find(|s| s.id == shape.id) {
            Some(slot) => {
                *slot = shape;
                self.flush();
                true
            }
            None => false,
        }
    }

    /// Remove the record with a matching id and persist.
    ///
    /// Returns false without persisting if no record matches. Remaining
    /// records keep their order.
    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.shapes.len();
        self.shapes.retain(|s| s.id != id);
        if self.shapes.len() == before {
            return false;
        }
        self.flush();
        true
    }

    /// Rewrite the whole persisted document.
    ///
    /// A write failure leaves the in-memory state authoritative.
    fn flush(&self) {
        let doc = StoreDocument {
            next_id: self.next_id,
            shapes: self.shapes.clone(),
        };
        match serde_json::to_string(&doc) {
            Ok(json) => {
                if let Err(e) = self.storage.set(STORE_KEY, &json) {
                    log::error!("Failed to persist shapes: {}", e);
                }
            }
            Err(e) => log::error!("Failed to serialize shapes: {}", e),
        }
    }
}

/// Parse the persisted document, accepting the legacy bare-array layout.
fn parse_document(json: &str) -> (Vec<Shape>, u64) {
    if let Ok(doc) = serde_json::from_str::<StoreDocument>(json) {
        return (doc.shapes, doc.next_id);
    }
    // Older files held just the array; recover the counter from the ids.
    if let Ok(shapes) = serde_json::from_str::<Vec<Shape>>(json) {
        let next_id = shapes.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        return (shapes, next_id);
    }
    log::warn!("Persisted shape data is unparseable, starting empty");
    (Vec::new(), 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeKind;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn new_shape(kind: ShapeKind) -> NewShape {
        NewShape {
            name: String::new(),
            kind,
        }
    }

    fn open_empty() -> ShapeStore {
        ShapeStore::open(Box::new(MemoryStorage::new()))
    }

    #[test]
    fn test_create_assigns_sequential_ids_and_defaults() {
        let mut store = open_empty();

        let a = store.create(new_shape(ShapeKind::Cube));
        let b = store.create(new_shape(ShapeKind::Sphere));

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.name, "Shape-1");
        assert_eq!(a.dimensions, Dimensions::default());
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn test_blank_name_gets_default_nonblank_preserved() {
        let mut store = open_empty();

        let blank = store.create(NewShape {
            name: "   ".to_string(),
            kind: ShapeKind::Cube,
        });
        let named = store.create(NewShape {
            name: "Widget".to_string(),
            kind: ShapeKind::Cone,
        });

        assert_eq!(blank.name, "Shape-1");
        assert_eq!(named.name, "Widget");
    }

    #[test]
    fn test_ids_stay_unique_across_delete_create_interleaving() {
        let mut store = open_empty();

        let mut seen = std::collections::HashSet::new();
        for round in 0..5 {
            let a = store.create(new_shape(ShapeKind::Cube));
            let b = store.create(new_shape(ShapeKind::Sphere));
            assert!(seen.insert(a.id), "duplicate id {} in round {}", a.id, round);
            assert!(seen.insert(b.id), "duplicate id {} in round {}", b.id, round);
            // Deleting the newest record must not let its id be reissued.
            store.delete(b.id);
        }
    }

    #[test]
    fn test_delete_highest_then_create_does_not_collide() {
        let mut store = open_empty();

        store.create(new_shape(ShapeKind::Cube));
        store.create(new_shape(ShapeKind::Cube));
        let c = store.create(new_shape(ShapeKind::Cube));
        store.delete(c.id);

        let d = store.create(new_shape(ShapeKind::Cube));
        assert_ne!(d.id, c.id);
        assert!(store.get(d.id).is_some());
    }

    #[test]
    fn test_update_round_trips_and_leaves_others_unchanged() {
        let mut store = open_empty();

        let a = store.create(new_shape(ShapeKind::Cube));
        let b = store.create(new_shape(ShapeKind::Sphere));

        let mut edited = b.clone();
        edited.name = "Edited".to_string();
        edited.dimensions.width = 4.5;
        edited.dimensions.x = -2.0;
        assert!(store.update(edited.clone()));

        assert_eq!(store.get(b.id), Some(&edited));
        assert_eq!(store.get(a.id), Some(&a));
    }

    #[test]
    fn test_update_missing_id_is_noop() {
        let mut store = open_empty();
        let a = store.create(new_shape(ShapeKind::Cube));

        let mut ghost = a.clone();
        ghost.id = 99;
        assert!(!store.update(ghost));
        assert_eq!(store.list(), &[a]);
    }

    #[test]
    fn test_delete_preserves_order_of_remaining() {
        let mut store = open_empty();

        let a = store.create(new_shape(ShapeKind::Cube));
        let b = store.create(new_shape(ShapeKind::Sphere));
        let c = store.create(new_shape(ShapeKind::Cone));

        assert!(store.delete(b.id));
        let ids: Vec<u64> = store.list().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);

        assert!(!store.delete(b.id));
    }

    #[test]
    fn test_persisted_state_survives_reopen() {
        let storage = Arc::new(MemoryStorage::new());

        let mut store = ShapeStore::open(Box::new(storage.clone()));
        let a = store.create(new_shape(ShapeKind::Cylinder));
        let b = store.create(new_shape(ShapeKind::Cube));
        store.delete(b.id);

        let mut reopened = ShapeStore::open(Box::new(storage));
        assert_eq!(reopened.list(), &[a]);

        // The counter persists too: the deleted id is not reissued.
        let c = reopened.create(new_shape(ShapeKind::Cone));
        assert_eq!(c.id, 3);
    }

    #[test]
    fn test_garbage_persisted_data_loads_empty() {
        let storage = MemoryStorage::new();
        storage.set(STORE_KEY, "not json at all {{{").unwrap();

        let store = ShapeStore::open(Box::new(storage));
        assert!(store.is_empty());
    }

    #[test]
    fn test_legacy_bare_array_is_accepted() {
        let storage = MemoryStorage::new();
        storage
            .set(
                STORE_KEY,
                r#"[{"id":2,"name":"Old","type":"Sphere",
                    "dimensions":{"width":1,"height":2,"depth":3,"x":0,"y":0,"z":0}}]"#,
            )
            .unwrap();

        let mut store = ShapeStore::open(Box::new(storage));
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].kind, ShapeKind::Sphere);

        // next_id recovered as max(id) + 1.
        let created = store.create(new_shape(ShapeKind::Cube));
        assert_eq!(created.id, 3);
    }
}
