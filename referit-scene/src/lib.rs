//! # referit-scene
//!
//! Deterministic resolution of referring expressions over labeled 3D boxes.
//!
//! ## Core Concepts
//! - **SceneObject**: an id, a category label and an axis-aligned box
//! - **SceneObjectIndex**: read-only lookup by id and by label
//! - **SpatialQuery**: target label + relation + anchor objects
//! - **ReferringExpressionResolver**: scores candidates by distance to a
//!   reference point and returns exactly one id, or an error
//!
//! ```rust
//! use referit_scene::{BoundingBox3D, ReferringExpressionResolver, SceneObject, SceneObjectIndex, SpatialQuery};
//!
//! let index = SceneObjectIndex::build(vec![
//!     SceneObject::new(20, "table", BoundingBox3D::new([6.59, 2.81, 0.58], [0.50, 0.47, 0.62])),
//!     SceneObject::new(19, "table", BoundingBox3D::new([3.62, 2.78, 0.47], [0.46, 0.50, 0.60])),
//!     SceneObject::new(8, "stairs", BoundingBox3D::new([8.35, 2.86, 0.70], [0.46, 0.55, 0.54])),
//!     SceneObject::new(9, "pillow", BoundingBox3D::new([4.96, 3.03, 0.88], [0.62, 0.26, 0.55])),
//! ])?;
//!
//! let query = SpatialQuery::between("table", "stairs", "pillow");
//! assert_eq!(ReferringExpressionResolver::new().resolve(&index, &query)?, 20);
//! # Ok::<(), referit_scene::Error>(())
//! ```

pub mod error;
pub mod geometry;
pub mod index;
pub mod object;
pub mod query;
pub mod resolver;
pub mod scene;

pub use error::{Error, ErrorKind, ErrorStatus, Result};
pub use geometry::{BoundingBox3D, Vec3};
pub use index::SceneObjectIndex;
pub use object::{ObjectId, SceneObject};
pub use query::{AnchorRef, Relation, SpatialQuery};
pub use resolver::{ReferringExpressionResolver, Resolution, ResolverConfig, DEFAULT_TOLERANCE};
pub use scene::Scene;
