//! Search and dependency chains from the command line

use crate::helpers::*;
use anyhow::Result;

fn ids(results: &serde_json::Value) -> Vec<String> {
  results
    .as_array()
    .map(|nodes| {
      nodes
        .iter()
        .filter_map(|n| n["id"].as_str().map(String::from))
        .collect()
    })
    .unwrap_or_default()
}

#[test]
fn test_search_by_name() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let results = workspace.json(&["search", "KAFKA", "--json"])?;

  // label match only: the KafkaTopic definition and the missing Kafka cluster placeholder
  assert_eq!(
    ids(&results),
    vec!["crd:kafkatopics.kafka.strimzi.io", "reference:Kafka:missing-kafka-cluster:data"]
  );
  Ok(())
}

#[test]
fn test_search_blank_term() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let results = workspace.json(&["search", "  ", "--json"])?;
  assert!(ids(&results).is_empty());
  Ok(())
}

#[test]
fn test_search_by_field() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let results = workspace.json(&[
    "search",
    "backend-svc",
    "--mode",
    "field",
    "--field",
    "spec.serviceName",
    "--json",
  ])?;
  assert_eq!(ids(&results), vec!["resource:Application:default:backend-app:production"]);

  let output = workspace.run_failing(&["search", "x", "--mode", "field"])?;
  assert_eq!(output.status.code(), Some(1));
  Ok(())
}

#[test]
fn test_search_dependencies() -> Result<()> {
  let workspace = TestWorkspace::new()?;

  let with = ids(&workspace.json(&["search", "backend-app", "--mode", "dependencies", "--json"])?);
  assert_eq!(with[0], "resource:Application:default:backend-app:production");
  assert!(with.contains(&"crd:applications.app.k8s.io".to_string()));
  assert!(with.contains(&"resource:Secret:default:backend-secrets:production".to_string()));
  assert!(with.contains(&"resource:Service:default:backend-svc:production".to_string()));

  let without = ids(&workspace.json(&[
    "search",
    "backend-app",
    "--mode",
    "dependencies",
    "--no-connected",
    "--json",
  ])?);
  assert_eq!(without, vec!["resource:Application:default:backend-app:production"]);
  Ok(())
}

#[test]
fn test_chain() -> Result<()> {
  let workspace = TestWorkspace::new()?;

  let upstream = ids(&workspace.json(&[
    "chain",
    "resource:Service:prometheus:prometheus-gateway:production",
    "--direction",
    "incoming",
    "--json",
  ])?);
  assert!(upstream.contains(&"resource:Prometheus:monitoring:cluster-monitoring:monitoring".to_string()));
  assert!(upstream.contains(&"crd:services.v1".to_string()));
  // the Prometheus definition reaches the gateway through its instance
  assert!(upstream.contains(&"crd:prometheuses.monitoring.coreos.com".to_string()));

  let output = workspace.run_failing(&["chain", "resource:Nope:x:y:z"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
  Ok(())
}
