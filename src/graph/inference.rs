//! Relationship inference: definitions, instances and mappings → graph
//!
//! Every instance is registered before any edge is added, so owner and
//! reference lookups never depend on input order.

use super::layout;
use super::resource_graph::{GraphEdge, GraphNode, NodeType, Position, Relation, ResourceGraph};
use super::style::edge_style;
use crate::core::config::{ReferenceRule, VizConfig};
use crate::model::{
  DEFINITION_KIND, FieldMapping, FieldPath, OwnerReference, ResourceDefinition, ResourceInstance, identity_key,
};
use serde_json::{Value, json};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Build the relationship graph for the given store contents.
pub fn infer(
  definitions: &[ResourceDefinition],
  instances: &[ResourceInstance],
  mappings: &[FieldMapping],
  config: &VizConfig,
) -> ResourceGraph {
  let mut builder = GraphBuilder::new(config, instances);

  builder.add_definitions(definitions);
  builder.add_instances();

  let rules: Vec<(ReferenceRule, FieldPath, Option<FieldPath>)> = config
    .inference
    .active_rules()
    .into_iter()
    .map(|rule| {
      let path = FieldPath::parse(&rule.path);
      let cluster_path = rule.cluster_path.as_deref().map(FieldPath::parse);
      (rule, path, cluster_path)
    })
    .collect();
  let known_clusters = builder.known_clusters();

  for i in 0..instances.len() {
    let Some(source) = builder.placed[i].clone() else {
      continue;
    };

    builder.link_definition(&source, &instances[i], definitions);
    builder.link_owners(&source, i);
    for (rule, path, cluster_path) in &rules {
      builder.link_rule(&source, i, rule, path, cluster_path.as_ref());
    }
    if config.inference.remote_write {
      builder.link_remote_writes(&source, i, &known_clusters);
    }
    for mapping in mappings {
      builder.link_mapping(&source, i, mapping);
    }
  }

  builder.mark_cross_cluster();

  let (nodes, edges) = (builder.nodes, builder.edges);
  tracing::debug!(nodes = nodes.len(), edges = edges.len(), "inferred relationship graph");

  ResourceGraph::from_parts(layout::arrange(nodes, &config.layout), edges)
}

struct GraphBuilder<'a> {
  config: &'a VizConfig,
  instances: &'a [ResourceInstance],

  /// Instance documents, for field lookups
  documents: Vec<Value>,

  /// Node id per instance; `None` for a dropped duplicate
  placed: Vec<Option<String>>,

  nodes: Vec<GraphNode>,
  node_index: HashMap<String, usize>,
  edges: Vec<GraphEdge>,
  edge_ids: HashSet<String>,
}

impl<'a> GraphBuilder<'a> {
  fn new(config: &'a VizConfig, instances: &'a [ResourceInstance]) -> Self {
    Self {
      config,
      instances,
      documents: instances.iter().map(ResourceInstance::to_document).collect(),
      placed: Vec::with_capacity(instances.len()),
      nodes: Vec::new(),
      node_index: HashMap::new(),
      edges: Vec::new(),
      edge_ids: HashSet::new(),
    }
  }

  fn cluster_of(&self, instance: &'a ResourceInstance) -> &'a str {
    instance.cluster(&self.config.clusters.annotation, &self.config.clusters.default_label)
  }

  fn push_node(&mut self, node: GraphNode) -> bool {
    if self.node_index.contains_key(&node.id) {
      return false;
    }
    self.node_index.insert(node.id.clone(), self.nodes.len());
    self.nodes.push(node);
    true
  }

  fn push_edge(&mut self, id: String, source: &str, target: &str, relation: Relation, label: &str) {
    if source == target || !self.edge_ids.insert(id.clone()) {
      return;
    }
    self.edges.push(GraphEdge {
      id,
      source: source.to_string(),
      target: target.to_string(),
      relation,
      label: label.to_string(),
      cross_cluster: false,
      style: edge_style(relation, false),
    });
  }

  fn push_relation(&mut self, source: &str, target: &str, relation: Relation, label: &str) {
    let id = format!("edge:{}:{}->{}", relation.as_str(), source, target);
    self.push_edge(id, source, target, relation, label);
  }

  fn add_definitions(&mut self, definitions: &[ResourceDefinition]) {
    let config = self.config;
    let clusters = &config.clusters;

    for definition in definitions {
      let name = definition_name(definition);
      let cluster = definition.cluster(&clusters.annotation, &clusters.default_label).to_string();

      let node = GraphNode {
        id: definition_node_id(definition),
        label: definition.kind_name().to_string(),
        kind: DEFINITION_KIND.to_string(),
        namespace: None,
        api_version: definition.served_api_version(),
        node_type: NodeType::Definition,
        key: identity_key(DEFINITION_KIND, None, &name, &cluster),
        color: clusters.color_for(&cluster),
        cluster,
        has_cross_cluster_dependencies: false,
        cross_cluster_dependencies: Vec::new(),
        position: Position::default(),
        data: serde_json::to_value(definition).unwrap_or_default(),
      };

      if !self.push_node(node) {
        tracing::warn!(definition = %name, "duplicate definition name, keeping the first");
      }
    }
  }

  fn add_instances(&mut self) {
    let instances = self.instances;

    for (i, instance) in instances.iter().enumerate() {
      let cluster = self.cluster_of(instance).to_string();
      let key = instance.identity_key(&cluster);

      let node = GraphNode {
        id: format!("resource:{}", key),
        label: instance.name().to_string(),
        kind: instance.kind.clone(),
        namespace: instance.namespace().map(str::to_string),
        api_version: instance.api_version.clone(),
        node_type: NodeType::Instance,
        key,
        color: self.config.clusters.color_for(&cluster),
        cluster,
        has_cross_cluster_dependencies: false,
        cross_cluster_dependencies: Vec::new(),
        position: Position::default(),
        data: self.documents[i].clone(),
      };

      let id = node.id.clone();
      if self.push_node(node) {
        self.placed.push(Some(id));
      } else {
        tracing::warn!(id = %id, "duplicate instance identity, keeping the first");
        self.placed.push(None);
      }
    }
  }

  /// Every cluster label carried by a definition or instance.
  fn known_clusters(&self) -> BTreeSet<String> {
    self
      .nodes
      .iter()
      .filter(|n| n.node_type != NodeType::Reference)
      .map(|n| n.cluster.clone())
      .collect()
  }

  /// Best placed instance of `kind`/`name`: target cluster first, then namespace.
  fn locate(&self, kind: &str, name: &str, namespace: Option<&str>, cluster: &str) -> Option<String> {
    let mut best: Option<(u8, usize)> = None;

    for (i, instance) in self.instances.iter().enumerate() {
      if self.placed[i].is_none() || instance.kind != kind || instance.name() != name {
        continue;
      }
      let mut score = 0;
      if self.cluster_of(instance) == cluster {
        score += 2;
      }
      if namespace.is_some() && instance.namespace() == namespace {
        score += 1;
      }
      if best.is_none_or(|(s, _)| score > s) {
        best = Some((score, i));
      }
    }

    best.and_then(|(_, i)| self.placed[i].clone())
  }

  /// Placeholder node for an object no instance provides.
  ///
  /// One placeholder per kind, name and cluster; referrers in the same cluster share it.
  fn ensure_reference(
    &mut self,
    kind: &str,
    name: &str,
    api_version: &str,
    namespace: Option<&str>,
    cluster: &str,
    uid: Option<&str>,
  ) -> String {
    let id = format!("reference:{}:{}:{}", kind, name, cluster);
    if self.node_index.contains_key(&id) {
      return id;
    }

    let mut metadata = json!({ "name": name });
    if let Some(ns) = namespace {
      metadata["namespace"] = json!(ns);
    }
    if let Some(uid) = uid {
      metadata["uid"] = json!(uid);
    }

    self.push_node(GraphNode {
      id: id.clone(),
      label: name.to_string(),
      kind: kind.to_string(),
      namespace: namespace.map(str::to_string),
      api_version: api_version.to_string(),
      node_type: NodeType::Reference,
      cluster: cluster.to_string(),
      key: identity_key(kind, namespace, name, cluster),
      color: self.config.clusters.color_for(cluster),
      has_cross_cluster_dependencies: false,
      cross_cluster_dependencies: Vec::new(),
      position: Position::default(),
      data: json!({
        "apiVersion": api_version,
        "kind": kind,
        "metadata": metadata,
      }),
    });
    id
  }

  fn link_definition(&mut self, source: &str, instance: &ResourceInstance, definitions: &[ResourceDefinition]) {
    let Some(definition) = definitions
      .iter()
      .find(|d| d.matches(&instance.kind, &instance.api_version))
    else {
      return;
    };

    self.push_relation(&definition_node_id(definition), source, Relation::Defines, "defines");
  }

  fn link_owners(&mut self, source: &str, i: usize) {
    let instances = self.instances;
    let instance = &instances[i];
    let namespace = instance.namespace();
    let cluster = self.cluster_of(instance);

    for owner in &instance.metadata.owner_references {
      let target = self
        .owner_by_uid(owner)
        .or_else(|| self.owner_by_name(owner, namespace, cluster))
        .unwrap_or_else(|| {
          self.ensure_reference(
            &owner.kind,
            &owner.name,
            &owner.api_version,
            namespace,
            cluster,
            owner.uid.as_deref(),
          )
        });
      self.push_relation(source, &target, Relation::OwnedBy, "ownedBy");
    }
  }

  fn owner_by_uid(&self, owner: &OwnerReference) -> Option<String> {
    let uid = owner.uid.as_deref().filter(|u| !u.is_empty())?;
    self
      .instances
      .iter()
      .enumerate()
      .find(|(i, inst)| self.placed[*i].is_some() && inst.uid() == Some(uid))
      .and_then(|(i, _)| self.placed[i].clone())
  }

  fn owner_by_name(&self, owner: &OwnerReference, namespace: Option<&str>, cluster: &str) -> Option<String> {
    let mut fallback = None;
    for (i, inst) in self.instances.iter().enumerate() {
      if self.placed[i].is_none() || inst.kind != owner.kind || inst.name() != owner.name || inst.namespace() != namespace
      {
        continue;
      }
      if self.cluster_of(inst) == cluster {
        return self.placed[i].clone();
      }
      fallback.get_or_insert(i);
    }
    fallback.and_then(|i| self.placed[i].clone())
  }

  fn link_rule(
    &mut self,
    source: &str,
    i: usize,
    rule: &ReferenceRule,
    path: &FieldPath,
    cluster_path: Option<&FieldPath>,
  ) {
    let document = &self.documents[i];
    let names: Vec<String> = match path.lookup(document) {
      Some(Value::String(name)) if !name.is_empty() => vec![name.clone()],
      Some(Value::Array(items)) => items
        .iter()
        .filter_map(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect(),
      _ => return,
    };

    let instances = self.instances;
    let instance = &instances[i];
    let cluster = cluster_path
      .and_then(|p| p.lookup(document))
      .and_then(Value::as_str)
      .filter(|c| !c.trim().is_empty())
      .map(str::to_string)
      .unwrap_or_else(|| self.cluster_of(instance).to_string());
    let namespace = rule.namespace.clone().or_else(|| instance.namespace().map(str::to_string));

    for name in names {
      let target = self
        .locate(&rule.kind, &name, namespace.as_deref(), &cluster)
        .unwrap_or_else(|| {
          self.ensure_reference(&rule.kind, &name, &rule.api_version, namespace.as_deref(), &cluster, None)
        });
      self.push_relation(source, &target, Relation::References, &rule.label);
    }
  }

  fn link_remote_writes(&mut self, source: &str, i: usize, known_clusters: &BTreeSet<String>) {
    let Some(targets) = self.documents[i].pointer("/spec/remoteWrite").and_then(Value::as_array) else {
      return;
    };

    let hosts: Vec<(String, String)> = targets
      .iter()
      .filter_map(|t| t.get("url").and_then(Value::as_str))
      .filter_map(service_and_cluster)
      .filter(|(_, cluster)| known_clusters.contains(cluster))
      .collect();

    for (service, cluster) in hosts {
      let target = self
        .locate("Service", &service, None, &cluster)
        .unwrap_or_else(|| self.ensure_reference("Service", &service, "v1", None, &cluster, None));
      self.push_relation(source, &target, Relation::RemoteWrite, "remoteWrite");
    }
  }

  fn link_mapping(&mut self, source: &str, i: usize, mapping: &FieldMapping) {
    if !mapping.applies_to_source(&self.instances[i]) {
      return;
    }
    let source_path = FieldPath::parse(&mapping.source_field);
    let target_path = FieldPath::parse(&mapping.target_field);
    let Some(value) = source_path.lookup_defined(&self.documents[i]) else {
      return;
    };

    let targets: Vec<String> = self
      .instances
      .iter()
      .enumerate()
      .filter(|(j, inst)| *j != i && mapping.applies_to_target(inst))
      .filter(|(j, _)| target_path.lookup_defined(&self.documents[*j]) == Some(value))
      .filter_map(|(j, _)| self.placed[j].clone())
      .collect();

    for target in targets {
      let id = format!("edge:mapping:{}:{}->{}", mapping.id, source, target);
      self.push_edge(id, source, &target, Relation::Mapping, &mapping.name);
    }
  }

  /// Flag edges whose endpoints sit in different clusters.
  fn mark_cross_cluster(&mut self) {
    for edge in &mut self.edges {
      let (Some(&s), Some(&t)) = (self.node_index.get(&edge.source), self.node_index.get(&edge.target)) else {
        continue;
      };
      if self.nodes[s].cluster == self.nodes[t].cluster {
        continue;
      }

      edge.cross_cluster = true;
      edge.style = edge_style(edge.relation, true);

      let key = self.nodes[t].key.clone();
      self.nodes[s].add_cross_cluster_dependency(&key);
    }
  }
}

/// `metadata.name`, or `plural.group` for an unnamed definition.
fn definition_name(definition: &ResourceDefinition) -> String {
  if definition.metadata.name.is_empty() {
    format!("{}.{}", definition.spec.names.plural, definition.spec.group)
  } else {
    definition.metadata.name.clone()
  }
}

pub fn definition_node_id(definition: &ResourceDefinition) -> String {
  format!("crd:{}", definition_name(definition))
}

/// `http://svc.cluster:9090/path` → `("svc", "cluster")`
fn service_and_cluster(url: &str) -> Option<(String, String)> {
  let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
  let authority = rest.split(['/', '?', '#']).next()?;
  let host_port = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
  let host = host_port.split(':').next()?;

  let mut labels = host.split('.');
  let service = labels.next().filter(|s| !s.is_empty())?;
  let cluster = labels.next().filter(|s| !s.is_empty())?;
  Some((service.to_string(), cluster.to_string()))
}
