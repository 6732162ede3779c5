//! Resource relationship graph on petgraph
//!
//! ## Graph Structure
//!
//! - **Directed Graph**: `A → B` means "A points at B" (defines, is owned by, references, maps to)
//! - **Nodes**: definitions, instances, and placeholder references, in lane order
//! - **Edges**: one per detected relationship, deduplicated by id
//! - **Index**: node id → node index for O(1) lookups
//!
//! The graph is ephemeral: it is rebuilt from the store on every command.

use crate::core::error::{NotFoundError, VizError, VizResult};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Lane a node is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
  Definition,
  Instance,
  Reference,
}

impl NodeType {
  pub fn as_str(self) -> &'static str {
    match self {
      NodeType::Definition => "definition",
      NodeType::Instance => "instance",
      NodeType::Reference => "reference",
    }
  }
}

/// Why two nodes are connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Relation {
  /// definition → instance
  Defines,
  /// instance → owner
  OwnedBy,
  /// instance → object named in a reference field
  References,
  /// instance → service it ships metrics to
  RemoteWrite,
  /// instance → instance via a user-defined field mapping
  Mapping,
}

impl Relation {
  pub fn as_str(self) -> &'static str {
    match self {
      Relation::Defines => "defines",
      Relation::OwnedBy => "ownedBy",
      Relation::References => "references",
      Relation::RemoteWrite => "remoteWrite",
      Relation::Mapping => "mapping",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
  pub x: f64,
  pub y: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
  pub id: String,
  pub label: String,
  pub kind: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub namespace: Option<String>,
  pub api_version: String,
  pub node_type: NodeType,
  pub cluster: String,
  /// `Kind:namespace:name:cluster`, as listed in other nodes' cross-cluster dependencies
  pub key: String,
  pub color: String,
  pub has_cross_cluster_dependencies: bool,
  pub cross_cluster_dependencies: Vec<String>,
  pub position: Position,
  /// Raw document the node was built from
  pub data: Value,
}

impl GraphNode {
  /// Record a cross-cluster target once, keeping first-seen order.
  pub fn add_cross_cluster_dependency(&mut self, key: &str) {
    if !self.cross_cluster_dependencies.iter().any(|k| k == key) {
      self.cross_cluster_dependencies.push(key.to_string());
    }
    self.has_cross_cluster_dependencies = true;
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeStyle {
  pub stroke: String,
  pub dashed: bool,
  pub animated: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
  pub id: String,
  pub source: String,
  pub target: String,
  pub relation: Relation,
  pub label: String,
  pub cross_cluster: bool,
  pub style: EdgeStyle,
}

/// Which edges to follow from a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDirection {
  Both,
  Incoming,
  Outgoing,
}

impl LinkDirection {
  pub fn parse(s: &str) -> VizResult<Self> {
    match s.to_lowercase().as_str() {
      "both" => Ok(Self::Both),
      "incoming" | "in" => Ok(Self::Incoming),
      "outgoing" | "out" => Ok(Self::Outgoing),
      _ => Err(VizError::message(format!(
        "Unknown direction '{}'. Valid directions: both, incoming, outgoing",
        s
      ))),
    }
  }

  fn petgraph_directions(self) -> &'static [Direction] {
    match self {
      LinkDirection::Both => &[Direction::Outgoing, Direction::Incoming],
      LinkDirection::Incoming => &[Direction::Incoming],
      LinkDirection::Outgoing => &[Direction::Outgoing],
    }
  }
}

/// Counts for status output.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphSummary {
  pub definitions: usize,
  pub instances: usize,
  pub references: usize,
  pub edges: usize,
  pub cross_cluster_edges: usize,
  pub clusters: BTreeSet<String>,
}

/// Serializable node/edge lists.
#[derive(Debug, Clone, Serialize)]
pub struct GraphView<'a> {
  pub nodes: Vec<&'a GraphNode>,
  pub edges: Vec<&'a GraphEdge>,
}

/// Relationship graph over definitions, instances and references.
pub struct ResourceGraph {
  graph: DiGraph<GraphNode, GraphEdge>,

  /// Index: node id → node index
  id_to_node: HashMap<String, NodeIndex>,
}

impl ResourceGraph {
  /// Assemble from laid-out nodes and edges.
  ///
  /// Node order is kept as given. Edges are added in order; an edge whose id was
  /// already seen, or whose endpoint is unknown, is dropped.
  pub fn from_parts(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
    let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());
    let mut id_to_node = HashMap::with_capacity(nodes.len());

    for node in nodes {
      if id_to_node.contains_key(&node.id) {
        tracing::warn!(id = %node.id, "dropping duplicate graph node");
        continue;
      }
      let id = node.id.clone();
      let idx = graph.add_node(node);
      id_to_node.insert(id, idx);
    }

    let mut seen_edges = HashSet::new();
    for edge in edges {
      let (Some(&from), Some(&to)) = (id_to_node.get(&edge.source), id_to_node.get(&edge.target)) else {
        tracing::warn!(id = %edge.id, "dropping edge with unknown endpoint");
        continue;
      };
      if !seen_edges.insert(edge.id.clone()) {
        continue;
      }
      graph.add_edge(from, to, edge);
    }

    Self { graph, id_to_node }
  }

  /// Nodes in lane order.
  pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
    self.graph.node_indices().map(move |idx| &self.graph[idx])
  }

  /// Edges in detection order.
  pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
    self.graph.edge_indices().map(move |idx| &self.graph[idx])
  }

  pub fn node_count(&self) -> usize {
    self.graph.node_count()
  }

  pub fn edge_count(&self) -> usize {
    self.graph.edge_count()
  }

  pub fn node(&self, id: &str) -> Option<&GraphNode> {
    self.id_to_node.get(id).map(|idx| &self.graph[*idx])
  }

  /// Find node index by id.
  fn find_node(&self, id: &str) -> VizResult<NodeIndex> {
    self
      .id_to_node
      .get(id)
      .copied()
      .ok_or_else(|| NotFoundError::Node { id: id.to_string() }.into())
  }

  fn adjacent(&self, idx: NodeIndex, direction: LinkDirection) -> Vec<NodeIndex> {
    let mut out: Vec<NodeIndex> = direction
      .petgraph_directions()
      .iter()
      .flat_map(|dir| self.graph.neighbors_directed(idx, *dir))
      .filter(|n| *n != idx)
      .collect();
    out.sort();
    out.dedup();
    out
  }

  /// Nodes one edge away, in node order.
  pub fn neighbors(&self, id: &str, direction: LinkDirection) -> VizResult<Vec<&GraphNode>> {
    let idx = self.find_node(id)?;
    Ok(self.adjacent(idx, direction).into_iter().map(|n| &self.graph[n]).collect())
  }

  /// Every node reachable from `id` following `direction`, nearest first.
  ///
  /// The start node is excluded; each node appears once even when the graph has cycles.
  pub fn dependency_chain(&self, id: &str, direction: LinkDirection) -> VizResult<Vec<&GraphNode>> {
    let start = self.find_node(id)?;

    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    let mut chain = Vec::new();

    while let Some(current) = queue.pop_front() {
      for next in self.adjacent(current, direction) {
        if visited.insert(next) {
          chain.push(&self.graph[next]);
          queue.push_back(next);
        }
      }
    }

    Ok(chain)
  }

  pub fn cross_cluster_edges(&self) -> impl Iterator<Item = &GraphEdge> {
    self.edges().filter(|e| e.cross_cluster)
  }

  pub fn summary(&self) -> GraphSummary {
    let mut summary = GraphSummary {
      edges: self.edge_count(),
      cross_cluster_edges: self.cross_cluster_edges().count(),
      ..Default::default()
    };

    for node in self.nodes() {
      match node.node_type {
        NodeType::Definition => summary.definitions += 1,
        NodeType::Instance => summary.instances += 1,
        NodeType::Reference => summary.references += 1,
      }
      summary.clusters.insert(node.cluster.clone());
    }

    summary
  }

  pub fn view(&self) -> GraphView<'_> {
    GraphView {
      nodes: self.nodes().collect(),
      edges: self.edges().collect(),
    }
  }

  /// Export graph to DOT format (Graphviz).
  ///
  /// # Example
  /// ```bash
  /// crd-graph graph --format dot > graph.dot
  /// dot -Tsvg graph.dot -o graph.svg
  /// ```
  pub fn to_dot(&self) -> String {
    use petgraph::dot::{Config, Dot};

    let dot = Dot::with_attr_getters(
      &self.graph,
      &[Config::EdgeNoLabel, Config::NodeNoLabel],
      &|_, edge_ref| {
        let edge = edge_ref.weight();
        let mut attrs = format!("label={:?} color={:?}", edge.label, edge.style.stroke);
        if edge.style.dashed {
          attrs.push_str(" style=dashed");
        }
        attrs
      },
      &|_, (_idx, node)| {
        let shape = match node.node_type {
          NodeType::Definition => "box",
          NodeType::Instance => "ellipse",
          NodeType::Reference => "note",
        };
        let mut attrs = format!(
          "label={:?} shape={} style=filled fillcolor={:?}",
          format!("{}\n{} ({})", node.label, node.kind, node.cluster),
          shape,
          node.color
        );
        if node.has_cross_cluster_dependencies {
          attrs.push_str(" penwidth=2");
        }
        attrs
      },
    );

    format!("{:?}", dot)
  }
}
