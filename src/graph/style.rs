//! Edge colours per relation

use super::resource_graph::{EdgeStyle, Relation};

pub const DEFINES_STROKE: &str = "#94a3b8";
pub const OWNED_BY_STROKE: &str = "#f43f5e";
pub const REFERENCES_STROKE: &str = "#3b82f6";
pub const MAPPING_STROKE: &str = "#6366f1";
pub const CROSS_CLUSTER_STROKE: &str = "#f97316";

/// Style for an edge, with cross-cluster highlighting taking precedence over the relation colour.
pub fn edge_style(relation: Relation, cross_cluster: bool) -> EdgeStyle {
  if cross_cluster {
    return EdgeStyle {
      stroke: CROSS_CLUSTER_STROKE.to_string(),
      dashed: true,
      animated: true,
    };
  }

  let (stroke, dashed, animated) = match relation {
    Relation::Defines => (DEFINES_STROKE, true, false),
    Relation::OwnedBy => (OWNED_BY_STROKE, false, true),
    Relation::References | Relation::RemoteWrite => (REFERENCES_STROKE, false, false),
    Relation::Mapping => (MAPPING_STROKE, false, true),
  };

  EdgeStyle {
    stroke: stroke.to_string(),
    dashed,
    animated,
  }
}
