//! Labeled scene objects

use crate::geometry::{BoundingBox3D, Vec3};
use serde::{Deserialize, Serialize};

/// Object identifier, unique within one scene
pub type ObjectId = u32;

/// A labeled box in a scene.
///
/// JSON form: `{"id": 20, "label": "table", "center": [..], "size": [..]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    /// Category name, e.g. "table"
    pub label: String,
    #[serde(flatten)]
    pub bbox: BoundingBox3D,
}

impl SceneObject {
    pub fn new(id: ObjectId, label: impl Into<String>, bbox: BoundingBox3D) -> Self {
        Self {
            id,
            label: label.into(),
            bbox,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.bbox.center()
    }

    /// Case-insensitive exact label comparison
    pub fn has_label(&self, label: &str) -> bool {
        normalize_label(&self.label) == normalize_label(label)
    }
}

/// Canonical form used for label matching
pub(crate) fn normalize_label(label: &str) -> String {
    label.to_lowercase()
}
