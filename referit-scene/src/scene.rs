//! # Scene Files
//!
//! JSON scene descriptions loaded from disk:
//!
//! ```json
//! {
//!   "scene_id": "scene0536_01",
//!   "objects": [
//!     {"id": 20, "label": "table", "center": [6.59, 2.81, 0.58], "size": [0.50, 0.47, 0.62]}
//!   ]
//! }
//! ```

use crate::error::{Error, ErrorKind, Result};
use crate::index::SceneObjectIndex;
use crate::object::SceneObject;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A scene as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub scene_id: String,
    pub objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new(scene_id: impl Into<String>, objects: Vec<SceneObject>) -> Self {
        Self {
            scene_id: scene_id.into(),
            objects,
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::from(e).with_operation("scene::parse"))
    }

    /// Read and parse a scene file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::from(e)
                .with_operation("scene::load")
                .with_context("path", path.display().to_string())
        })?;
        let scene = Self::from_json_str(&content)
            .map_err(|e| e.with_context("path", path.display().to_string()))?;

        tracing::debug!(
            scene_id = %scene.scene_id,
            objects = scene.objects.len(),
            path = %path.display(),
            "loaded scene"
        );
        Ok(scene)
    }

    /// Write the scene as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            Error::new(ErrorKind::SerializationFailed, e.to_string())
                .with_operation("scene::save")
        })?;
        std::fs::write(path, content).map_err(|e| {
            Error::from(e)
                .with_operation("scene::save")
                .with_context("path", path.display().to_string())
        })
    }

    /// Build the lookup index, consuming the scene
    pub fn into_index(self) -> Result<SceneObjectIndex> {
        let scene_id = self.scene_id;
        SceneObjectIndex::build(self.objects).map_err(|e| e.with_context("scene_id", scene_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox3D;
    use serde_json::json;

    fn sample() -> Scene {
        Scene::new(
            "scene0536_01",
            vec![
                SceneObject::new(20, "table", BoundingBox3D::new([6.59, 2.81, 0.58], [0.5, 0.47, 0.62])),
                SceneObject::new(8, "stairs", BoundingBox3D::new([8.35, 2.86, 0.70], [0.46, 0.55, 0.54])),
            ],
        )
    }

    #[test]
    fn test_parse() {
        let content = json!({
            "scene_id": "scene0536_01",
            "objects": [
                {"id": 20, "label": "table", "center": [6.59, 2.81, 0.58], "size": [0.5, 0.47, 0.62]},
                {"id": 8, "label": "stairs", "center": [8.35, 2.86, 0.70], "size": [0.46, 0.55, 0.54]}
            ]
        })
        .to_string();

        assert_eq!(Scene::from_json_str(&content).unwrap(), sample());
    }

    #[test]
    fn test_scene_id_optional() {
        let scene = Scene::from_json_str(r#"{"objects": []}"#).unwrap();
        assert!(scene.scene_id.is_empty());
        assert!(scene.objects.is_empty());
    }

    #[test]
    fn test_parse_error() {
        let err = Scene::from_json_str(r#"{"objects": [{"id": "x"}]}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailed);
        assert_eq!(err.operation(), "scene::parse");
    }

    #[test]
    fn test_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");

        sample().save(&path).unwrap();
        assert_eq!(Scene::load(&path).unwrap(), sample());
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = Scene::load(dir.path().join("missing.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
        assert!(err.context_value("path").is_some_and(|p| p.ends_with("missing.json")));
    }

    #[test]
    fn test_into_index_reports_scene() {
        let mut scene = sample();
        scene.objects.push(scene.objects[0].clone());

        let err = scene.into_index().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateId);
        assert_eq!(err.context_value("scene_id"), Some("scene0536_01"));
    }
}
