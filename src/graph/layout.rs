use super::resource_graph::{GraphNode, NodeType, Position};
use crate::core::config::LayoutConfig;

/// Place nodes in three vertical lanes and order them lane by lane.
///
/// Definitions come first, then instances, then references; order within a lane is kept.
pub fn arrange(nodes: Vec<GraphNode>, layout: &LayoutConfig) -> Vec<GraphNode> {
  let mut lanes: [Vec<GraphNode>; 3] = Default::default();
  for node in nodes {
    let lane = match node.node_type {
      NodeType::Definition => 0,
      NodeType::Instance => 1,
      NodeType::Reference => 2,
    };
    lanes[lane].push(node);
  }

  let [definitions, instances, references] = lanes;
  let mut out = Vec::with_capacity(definitions.len() + instances.len() + references.len());

  for (nodes, x, spacing) in [
    (definitions, layout.definition_x, layout.definition_spacing),
    (instances, layout.instance_x, layout.row_spacing),
    (references, layout.reference_x, layout.row_spacing),
  ] {
    for (i, mut node) in nodes.into_iter().enumerate() {
      node.position = Position {
        x,
        y: i as f64 * spacing,
      };
      out.push(node);
    }
  }

  out
}
