//! # Spatial Queries
//!
//! A parsed referring expression: which label the answer carries, the
//! spatial relation it stands in, and the anchor objects that relation is
//! measured against.
//!
//! ```rust
//! use referit_scene::{AnchorRef, Relation, SpatialQuery};
//!
//! // "the table that is in the center of the stairs and the pillow"
//! let query = SpatialQuery::new("table", Relation::Between)
//!     .with_anchor("stairs")
//!     .with_anchor(AnchorRef::Id(9));
//! assert_eq!(query.anchors[1], AnchorRef::Id(9));
//! ```

use crate::error::{Error, Result};
use crate::object::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Spatial relation between the target and its anchors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relation {
    /// Closest to the midpoint of two anchors
    Between,
    /// Closest to one anchor
    NearestTo,
    /// Farthest from one anchor
    FarthestFrom,
}

impl Relation {
    /// Number of anchors the relation takes
    pub fn arity(&self) -> usize {
        match self {
            Relation::Between => 2,
            Relation::NearestTo | Relation::FarthestFrom => 1,
        }
    }

    /// Whether the best candidate has the largest score instead of the smallest
    pub fn maximizes(&self) -> bool {
        matches!(self, Relation::FarthestFrom)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Between => "BETWEEN",
            Relation::NearestTo => "NEAREST_TO",
            Relation::FarthestFrom => "FARTHEST_FROM",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "between" | "center_of" | "middle_of" => Ok(Relation::Between),
            "nearest_to" | "nearest" | "closest_to" | "closest" => Ok(Relation::NearestTo),
            "farthest_from" | "farthest" | "furthest_from" | "furthest" => {
                Ok(Relation::FarthestFrom)
            }
            _ => Err(Error::parse_failed(format!("unknown relation '{}'", s))
                .with_operation("query::parse_relation")
                .with_context("input", s)),
        }
    }
}

/// Reference to an anchor object, either by id or by a label that must
/// name exactly one object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnchorRef {
    Id(ObjectId),
    Label(String),
}

impl From<ObjectId> for AnchorRef {
    fn from(id: ObjectId) -> Self {
        AnchorRef::Id(id)
    }
}

impl From<&str> for AnchorRef {
    fn from(label: &str) -> Self {
        AnchorRef::Label(label.to_string())
    }
}

impl From<String> for AnchorRef {
    fn from(label: String) -> Self {
        AnchorRef::Label(label)
    }
}

impl fmt::Display for AnchorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorRef::Id(id) => write!(f, "#{}", id),
            AnchorRef::Label(label) => write!(f, "'{}'", label),
        }
    }
}

impl FromStr for AnchorRef {
    type Err = Error;

    /// Unsigned integers become ids, anything else a label
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::parse_failed("empty anchor").with_operation("query::parse_anchor"));
        }
        Ok(match s.trim_start_matches('#').parse::<ObjectId>() {
            Ok(id) => AnchorRef::Id(id),
            Err(_) => AnchorRef::Label(s.to_string()),
        })
    }
}

/// One referring expression, built per resolution call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialQuery {
    pub target_label: String,
    pub relation: Relation,
    #[serde(default)]
    pub anchors: Vec<AnchorRef>,
}

impl SpatialQuery {
    pub fn new(target_label: impl Into<String>, relation: Relation) -> Self {
        Self {
            target_label: target_label.into(),
            relation,
            anchors: Vec::new(),
        }
    }

    pub fn with_anchor(mut self, anchor: impl Into<AnchorRef>) -> Self {
        self.anchors.push(anchor.into());
        self
    }

    /// Shorthand for `target BETWEEN a AND b`
    pub fn between(
        target_label: impl Into<String>,
        a: impl Into<AnchorRef>,
        b: impl Into<AnchorRef>,
    ) -> Self {
        Self::new(target_label, Relation::Between)
            .with_anchor(a)
            .with_anchor(b)
    }

    pub fn nearest_to(target_label: impl Into<String>, anchor: impl Into<AnchorRef>) -> Self {
        Self::new(target_label, Relation::NearestTo).with_anchor(anchor)
    }

    pub fn farthest_from(target_label: impl Into<String>, anchor: impl Into<AnchorRef>) -> Self {
        Self::new(target_label, Relation::FarthestFrom).with_anchor(anchor)
    }
}

impl fmt::Display for SpatialQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' {}", self.target_label, self.relation)?;
        for (i, anchor) in self.anchors.iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            write!(f, "{}", anchor)?;
        }
        Ok(())
    }
}
