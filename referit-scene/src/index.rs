//! # Scene Object Index
//!
//! Read-only index over the objects of one scene. Objects keep their input
//! order; lookups by id go through a hash map and lookups by label through
//! a map keyed on the lowercased label.

use crate::error::{Error, Result};
use crate::object::{normalize_label, ObjectId, SceneObject};
use std::collections::HashMap;

/// Immutable collection of scene objects with id and label lookup.
///
/// Built once with [`SceneObjectIndex::build`]; holds no interior
/// mutability, so a shared reference can be read from many threads.
#[derive(Debug, Clone, Default)]
pub struct SceneObjectIndex {
    objects: Vec<SceneObject>,
    by_id: HashMap<ObjectId, usize>,
    /// Positions into `objects`, ascending, per normalized label
    by_label: HashMap<String, Vec<usize>>,
}

impl SceneObjectIndex {
    /// Build an index, rejecting duplicate ids and malformed boxes
    pub fn build(objects: impl IntoIterator<Item = SceneObject>) -> Result<Self> {
        let objects: Vec<SceneObject> = objects.into_iter().collect();
        let mut by_id = HashMap::with_capacity(objects.len());
        let mut by_label: HashMap<String, Vec<usize>> = HashMap::new();

        for (pos, obj) in objects.iter().enumerate() {
            obj.bbox
                .validate()
                .map_err(|reason| Error::invalid_box(obj.id, reason).with_operation("index::build"))?;

            if by_id.insert(obj.id, pos).is_some() {
                return Err(Error::duplicate_id(obj.id).with_operation("index::build"));
            }

            by_label
                .entry(normalize_label(&obj.label))
                .or_default()
                .push(pos);
        }

        tracing::debug!(
            objects = objects.len(),
            labels = by_label.len(),
            "built scene object index"
        );

        Ok(Self {
            objects,
            by_id,
            by_label,
        })
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Get an object by id
    pub fn get(&self, id: ObjectId) -> Result<&SceneObject> {
        self.by_id
            .get(&id)
            .map(|&pos| &self.objects[pos])
            .ok_or_else(|| Error::object_not_found(id).with_operation("index::get"))
    }

    /// All objects whose label equals `label`, ignoring case, in input order.
    ///
    /// An unknown label yields an empty vector.
    pub fn filter_by_label(&self, label: &str) -> Vec<&SceneObject> {
        self.by_label
            .get(&normalize_label(label))
            .map(|positions| positions.iter().map(|&pos| &self.objects[pos]).collect())
            .unwrap_or_default()
    }

    /// Objects in input order
    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    /// Distinct labels in first-seen order, as written on the first object
    pub fn labels(&self) -> Vec<&str> {
        let mut firsts: Vec<usize> = self.by_label.values().map(|p| p[0]).collect();
        firsts.sort_unstable();
        firsts
            .into_iter()
            .map(|pos| self.objects[pos].label.as_str())
            .collect()
    }
}
