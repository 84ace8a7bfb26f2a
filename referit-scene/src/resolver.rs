//! # Referring Expression Resolver
//!
//! Turns a [`SpatialQuery`] into exactly one object id, or a typed error.
//!
//! Resolution order:
//! 1. Candidates are the objects carrying the target label
//! 2. Anchor count is checked against the relation's arity
//! 3. Anchors are resolved by id or by unique label
//! 4. Every candidate is scored by its center's distance to the reference
//!    point (the anchor center, or the midpoint of two anchor centers)
//! 5. The best score wins; a tie within tolerance is an error
//!
//! The resolver never logs errors; it only returns them.

use crate::error::{Error, Result};
use crate::geometry::Vec3;
use crate::index::SceneObjectIndex;
use crate::object::{ObjectId, SceneObject};
use crate::query::{AnchorRef, Relation, SpatialQuery};
use serde::{Deserialize, Serialize};

/// Default relative tolerance when comparing candidate scores
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Resolver settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Relative tolerance under which two scores count as equal.
    /// Scores below 1.0 are compared with it as an absolute bound.
    pub tolerance: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl ResolverConfig {
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(Error::config_invalid(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            ))
            .with_operation("resolver::config"));
        }
        Ok(())
    }

    fn scores_tie(&self, a: f64, b: f64) -> bool {
        // infinite scores only tie with themselves
        a == b || (a - b).abs() <= self.tolerance * a.abs().max(b.abs()).max(1.0)
    }
}

/// A successful resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub id: ObjectId,
    /// Distance from the winner's center to `reference`
    pub score: f64,
    /// Point the candidates were measured against
    pub reference: Vec3,
}

/// Stateless evaluator for spatial queries
#[derive(Debug, Clone, Default)]
pub struct ReferringExpressionResolver {
    config: ResolverConfig,
}

impl ReferringExpressionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver with custom settings
    pub fn with_config(config: ResolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `query` to a single object id
    pub fn resolve(&self, index: &SceneObjectIndex, query: &SpatialQuery) -> Result<ObjectId> {
        self.resolve_detailed(index, query).map(|r| r.id)
    }

    /// Resolve `query`, also reporting the winning score and reference point
    pub fn resolve_detailed(
        &self,
        index: &SceneObjectIndex,
        query: &SpatialQuery,
    ) -> Result<Resolution> {
        let candidates = index.filter_by_label(&query.target_label);
        if candidates.is_empty() {
            return Err(Error::no_candidates(&query.target_label).with_operation("resolver::resolve"));
        }

        let expected = query.relation.arity();
        if query.anchors.len() != expected {
            return Err(Error::arity(query.relation.as_str(), expected, query.anchors.len())
                .with_operation("resolver::resolve"));
        }

        let anchors = query
            .anchors
            .iter()
            .map(|anchor| resolve_anchor(index, anchor))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| e.with_operation("resolver::resolve"))?;

        let reference = reference_point(query.relation, &anchors);
        tracing::debug!(
            query = %query,
            candidates = candidates.len(),
            reference = %reference,
            "resolving referring expression"
        );

        let scored: Vec<(ObjectId, f64)> = candidates
            .iter()
            .map(|c| {
                let score = c.center().distance(&reference);
                tracing::debug!(id = c.id, score, "scored candidate");
                (c.id, score)
            })
            .collect();

        let resolution = self.select(query.relation, &scored, reference)?;
        tracing::debug!(id = resolution.id, score = resolution.score, "selected object");
        Ok(resolution)
    }

    /// Pick the single best score, refusing ties
    fn select(
        &self,
        relation: Relation,
        scored: &[(ObjectId, f64)],
        reference: Vec3,
    ) -> Result<Resolution> {
        let best = scored
            .iter()
            .map(|&(_, score)| score)
            .reduce(|a, b| if relation.maximizes() { a.max(b) } else { a.min(b) })
            .ok_or_else(|| Error::unexpected("no scored candidates").with_operation("resolver::select"))?;

        let winners: Vec<ObjectId> = scored
            .iter()
            .filter(|&&(_, score)| self.config.scores_tie(score, best))
            .map(|&(id, _)| id)
            .collect();

        match winners.as_slice() {
            [] => Err(Error::unexpected(format!("best score {} matched no candidate", best))
                .with_context("relation", relation.as_str())
                .with_operation("resolver::select")),
            [id] => Ok(Resolution {
                id: *id,
                score: best,
                reference,
            }),
            _ => Err(Error::ambiguous_result(&winners, best)
                .with_context("relation", relation.as_str())
                .with_operation("resolver::select")),
        }
    }
}

/// Look up one anchor; a label must match exactly one object
fn resolve_anchor<'a>(index: &'a SceneObjectIndex, anchor: &AnchorRef) -> Result<&'a SceneObject> {
    let found = match anchor {
        AnchorRef::Id(id) => index.get(*id)?,
        AnchorRef::Label(label) => match index.filter_by_label(label).as_slice() {
            [] => return Err(Error::label_not_found(label)),
            [only] => *only,
            many => return Err(Error::ambiguous_anchor(label, many.len())),
        },
    };
    tracing::trace!(anchor = %anchor, id = found.id, "resolved anchor");
    Ok(found)
}

fn reference_point(relation: Relation, anchors: &[&SceneObject]) -> Vec3 {
    match (relation, anchors) {
        (Relation::Between, [a, b]) => a.center().midpoint(&b.center()),
        (_, [a, ..]) => a.center(),
        // arity is checked before anchors are resolved
        (_, []) => Vec3::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::geometry::BoundingBox3D;

    fn obj(id: ObjectId, label: &str, center: [f64; 3]) -> SceneObject {
        SceneObject::new(id, label, BoundingBox3D::new(center, [0.5, 0.5, 0.5]))
    }

    /// scene0536_01 at full precision
    fn scene() -> SceneObjectIndex {
        SceneObjectIndex::build(vec![
            SceneObject::new(
                20,
                "table",
                BoundingBox3D::new(
                    [6.5921674, 2.8146675, 0.5843334],
                    [0.50327635, 0.4665177, 0.61986494],
                ),
            ),
            SceneObject::new(
                19,
                "table",
                BoundingBox3D::new(
                    [3.6230552, 2.7831311, 0.4653807],
                    [0.4619925, 0.5032735, 0.60380846],
                ),
            ),
            SceneObject::new(
                8,
                "stairs",
                BoundingBox3D::new(
                    [8.354945, 2.8620052, 0.7037763],
                    [0.45843983, 0.5531683, 0.53641963],
                ),
            ),
            SceneObject::new(
                9,
                "pillow",
                BoundingBox3D::new(
                    [4.9617434, 3.0305147, 0.87839276],
                    [0.6176739, 0.26221752, 0.55044407],
                ),
            ),
        ])
        .unwrap()
    }

    fn between(target: &str, a: u32, b: u32) -> SpatialQuery {
        SpatialQuery::between(target, AnchorRef::Id(a), AnchorRef::Id(b))
    }

    #[test]
    fn test_table_between_stairs_and_pillow() {
        let index = scene();
        let resolver = ReferringExpressionResolver::new();

        let resolution = resolver
            .resolve_detailed(&index, &between("table", 8, 9))
            .unwrap();

        assert_eq!(resolution.id, 20);
        assert!((resolution.reference.x - 6.6583442).abs() < 1e-6);
        assert!((resolution.reference.y - 2.94626).abs() < 1e-5);
        assert!((resolution.reference.z - 0.79108453).abs() < 1e-6);
        assert!(resolution.score < 0.3);

        let other = index.get(19).unwrap().center().distance(&resolution.reference);
        assert!(other > 3.0);
    }

    #[test]
    fn test_between_is_symmetric() {
        let index = scene();
        let resolver = ReferringExpressionResolver::new();

        let forward = resolver.resolve(&index, &between("table", 8, 9)).unwrap();
        let backward = resolver.resolve(&index, &between("table", 9, 8)).unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_label_anchors() {
        let index = scene();
        let query = SpatialQuery::between("Table", "stairs", "PILLOW");
        assert_eq!(ReferringExpressionResolver::new().resolve(&index, &query).unwrap(), 20);
    }

    #[test]
    fn test_nearest_and_farthest() {
        let index = scene();
        let resolver = ReferringExpressionResolver::new();

        let nearest = SpatialQuery::nearest_to("table", AnchorRef::Id(9));
        assert_eq!(resolver.resolve(&index, &nearest).unwrap(), 19);

        let farthest = SpatialQuery::farthest_from("table", "pillow");
        assert_eq!(resolver.resolve(&index, &farthest).unwrap(), 20);

        let nearest_stairs = SpatialQuery::nearest_to("table", "stairs");
        assert_eq!(resolver.resolve(&index, &nearest_stairs).unwrap(), 20);
    }

    #[test]
    fn test_no_candidates() {
        let index = scene();
        let err = ReferringExpressionResolver::new()
            .resolve(&index, &between("chair", 8, 9))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoCandidates);
        assert_eq!(err.context_value("target_label"), Some("chair"));
    }

    #[test]
    fn test_empty_index_has_no_candidates() {
        let index = SceneObjectIndex::build(Vec::new()).unwrap();
        let err = ReferringExpressionResolver::new()
            .resolve(&index, &SpatialQuery::nearest_to("table", AnchorRef::Id(1)))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoCandidates);
    }

    #[test]
    fn test_arity() {
        let index = scene();
        let resolver = ReferringExpressionResolver::new();

        let three = between("table", 8, 9).with_anchor(AnchorRef::Id(19));
        let err = resolver.resolve(&index, &three).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Arity);
        assert_eq!(err.context_value("expected"), Some("2"));
        assert_eq!(err.context_value("got"), Some("3"));

        let none = SpatialQuery::new("table", Relation::NearestTo);
        let err = resolver.resolve(&index, &none).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Arity);
    }

    #[test]
    fn test_anchor_not_found() {
        let index = scene();
        let resolver = ReferringExpressionResolver::new();

        let err = resolver.resolve(&index, &between("table", 8, 77)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.operation(), "resolver::resolve");

        let err = resolver
            .resolve(&index, &SpatialQuery::nearest_to("table", "lamp"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.context_value("label"), Some("lamp"));
    }

    #[test]
    fn test_ambiguous_anchor() {
        let index = SceneObjectIndex::build(vec![
            obj(1, "chair", [0.0, 0.0, 0.0]),
            obj(2, "lamp", [1.0, 0.0, 0.0]),
            obj(3, "lamp", [2.0, 0.0, 0.0]),
        ])
        .unwrap();

        let err = ReferringExpressionResolver::new()
            .resolve(&index, &SpatialQuery::nearest_to("chair", "lamp"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmbiguousAnchor);
        assert_eq!(err.context_value("matches"), Some("2"));
    }

    #[test]
    fn test_equidistant_candidates_are_ambiguous() {
        let index = SceneObjectIndex::build(vec![
            obj(1, "cup", [1.0, 0.0, 0.0]),
            obj(2, "cup", [-1.0, 0.0, 0.0]),
            obj(3, "plate", [0.0, 0.0, 0.0]),
        ])
        .unwrap();
        let resolver = ReferringExpressionResolver::new();

        for query in [
            SpatialQuery::nearest_to("cup", "plate"),
            SpatialQuery::farthest_from("cup", "plate"),
        ] {
            let err = resolver.resolve(&index, &query).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::AmbiguousResult);
            assert_eq!(err.context_value("candidates"), Some("1, 2"));
        }
    }

    #[test]
    fn test_tolerance_controls_ties() {
        let index = SceneObjectIndex::build(vec![
            obj(1, "cup", [10.0, 0.0, 0.0]),
            obj(2, "cup", [-10.000001, 0.0, 0.0]),
            obj(3, "plate", [0.0, 0.0, 0.0]),
        ])
        .unwrap();
        let query = SpatialQuery::nearest_to("cup", "plate");

        let strict = ReferringExpressionResolver::new();
        assert_eq!(strict.resolve(&index, &query).unwrap(), 1);

        let loose = ReferringExpressionResolver::with_config(ResolverConfig::with_tolerance(1e-6)).unwrap();
        let err = loose.resolve(&index, &query).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmbiguousResult);
    }

    #[test]
    fn test_anchor_can_be_the_answer() {
        let index = SceneObjectIndex::build(vec![
            obj(20, "table", [6.59, 2.81, 0.58]),
            obj(19, "table", [3.62, 2.78, 0.47]),
        ])
        .unwrap();
        let resolver = ReferringExpressionResolver::new();

        let nearest = SpatialQuery::nearest_to("table", AnchorRef::Id(20));
        let resolution = resolver.resolve_detailed(&index, &nearest).unwrap();
        assert_eq!(resolution.id, 20);
        assert_eq!(resolution.score, 0.0);

        let lonely = SceneObjectIndex::build(vec![obj(1, "table", [0.0; 3])]).unwrap();
        let own = SpatialQuery::nearest_to("table", AnchorRef::Id(1));
        assert_eq!(resolver.resolve(&lonely, &own).unwrap(), 1);
    }

    #[test]
    fn test_huge_coordinates() {
        let index = SceneObjectIndex::build(vec![
            obj(1, "cup", [1e200, 0.0, 0.0]),
            obj(2, "plate", [0.0, 0.0, 0.0]),
        ])
        .unwrap();
        let resolver = ReferringExpressionResolver::new();
        let query = SpatialQuery::nearest_to("cup", "plate");

        let resolution = resolver.resolve_detailed(&index, &query).unwrap();
        assert_eq!(resolution.id, 1);
        assert_eq!(resolution.score, 1e200);
    }

    #[test]
    fn test_overflowing_distance_still_resolves() {
        let index = SceneObjectIndex::build(vec![
            obj(1, "cup", [1e308, 0.0, 0.0]),
            obj(2, "plate", [-1e308, 0.0, 0.0]),
        ])
        .unwrap();
        let resolver = ReferringExpressionResolver::new();

        let resolution = resolver
            .resolve_detailed(&index, &SpatialQuery::nearest_to("cup", "plate"))
            .unwrap();
        assert_eq!(resolution.id, 1);
        assert!(resolution.score.is_infinite());
    }

    #[test]
    fn test_infinite_scores_tie() {
        let index = SceneObjectIndex::build(vec![
            obj(1, "cup", [1e308, 0.0, 0.0]),
            obj(2, "cup", [1e308, 1.0, 0.0]),
            obj(3, "plate", [-1e308, 0.0, 0.0]),
        ])
        .unwrap();

        let err = ReferringExpressionResolver::new()
            .resolve(&index, &SpatialQuery::nearest_to("cup", "plate"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmbiguousResult);
        assert_eq!(err.context_value("candidates"), Some("1, 2"));
    }

    #[test]
    fn test_invalid_config() {
        for tolerance in [-1.0, f64::NAN, f64::INFINITY] {
            let err = ReferringExpressionResolver::with_config(ResolverConfig::with_tolerance(tolerance))
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        }
    }

    #[test]
    fn test_config_json_defaults() {
        let config: ResolverConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ResolverConfig::default());

        let config: ResolverConfig = serde_json::from_str(r#"{"tolerance": 0.01}"#).unwrap();
        assert_eq!(config.tolerance, 0.01);
    }
}
