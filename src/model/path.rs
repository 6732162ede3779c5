//! Dotted field paths with optional array indices (`spec.routes[0].services`)

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
  Key(String),
  Index(usize),
}

/// A parsed field path.
///
/// Parsing never fails: a malformed index (`items[x]`) becomes a segment that
/// matches nothing, so lookups on user-typed paths return `None` instead of erroring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
  segments: Vec<Option<Segment>>,
}

impl FieldPath {
  pub fn parse(path: &str) -> Self {
    let mut segments = Vec::new();

    for part in path.split('.').filter(|p| !p.is_empty()) {
      match part.split_once('[') {
        Some((key, rest)) => {
          if !key.is_empty() {
            segments.push(Some(Segment::Key(key.to_string())));
          }
          // `items[0][1]` style chains
          for index in rest.split('[') {
            let index = index.trim_end_matches(']');
            segments.push(index.parse::<usize>().ok().map(Segment::Index));
          }
        }
        None => segments.push(Some(Segment::Key(part.to_string()))),
      }
    }

    Self { segments }
  }

  pub fn is_empty(&self) -> bool {
    self.segments.is_empty()
  }

  /// Resolve the path against a document.
  pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
    if self.segments.is_empty() {
      return None;
    }

    let mut current = root;
    for segment in &self.segments {
      current = match segment.as_ref()? {
        Segment::Key(key) => current.as_object()?.get(key)?,
        Segment::Index(index) => current.as_array()?.get(*index)?,
      };
    }
    Some(current)
  }

  /// Resolve and discard explicit nulls.
  pub fn lookup_defined<'a>(&self, root: &'a Value) -> Option<&'a Value> {
    self.lookup(root).filter(|v| !v.is_null())
  }
}

/// String form of a JSON value as a user would read it (strings unquoted).
pub fn display_value(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    Value::Null => "null".to_string(),
    other => other.to_string(),
  }
}
