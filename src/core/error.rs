//! Error types for crd-graph with contextual messages and exit codes
//!
//! Every failure is recoverable within the session: errors are reported with a
//! help hint and the store is left as it was before the failing command.

use std::fmt;
use std::io;

/// Exit codes for crd-graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, unknown ids)
  User = 1,
  /// System error (I/O, unreadable state file)
  System = 2,
  /// Import validation failure (malformed or incomplete documents)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for crd-graph
#[derive(Debug)]
pub enum VizError {
  /// Configuration errors
  Config(ConfigError),

  /// Import/parse errors
  Import(ImportError),

  /// Lookup of an unknown definition, instance, mapping or node
  NotFound(NotFoundError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl VizError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    VizError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    VizError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      VizError::Message { message, context, help } => VizError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      VizError::Io(err) => VizError::Message {
        message: format!("I/O error: {}", err),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      VizError::Config(_) => ExitCode::User,
      VizError::Import(_) => ExitCode::Validation,
      VizError::NotFound(_) => ExitCode::User,
      VizError::Io(_) => ExitCode::System,
      VizError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      VizError::Config(e) => e.help_message(),
      VizError::Import(e) => e.help_message(),
      VizError::NotFound(e) => e.help_message(),
      VizError::Message { help, .. } => help.clone(),
      VizError::Io(_) => None,
    }
  }
}

impl fmt::Display for VizError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VizError::Config(e) => write!(f, "{}", e),
      VizError::Import(e) => write!(f, "{}", e),
      VizError::NotFound(e) => write!(f, "{}", e),
      VizError::Io(e) => write!(f, "I/O error: {}", e),
      VizError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for VizError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      VizError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for VizError {
  fn from(err: io::Error) -> Self {
    VizError::Io(err)
  }
}

impl From<String> for VizError {
  fn from(msg: String) -> Self {
    VizError::message(msg)
  }
}

impl From<&str> for VizError {
  fn from(msg: &str) -> Self {
    VizError::message(msg)
  }
}

impl From<serde_json::Error> for VizError {
  fn from(err: serde_json::Error) -> Self {
    VizError::message(format!("JSON error: {}", err))
  }
}

impl From<serde_yaml::Error> for VizError {
  fn from(err: serde_yaml::Error) -> Self {
    VizError::message(format!("YAML error: {}", err))
  }
}

impl From<toml_edit::de::Error> for VizError {
  fn from(err: toml_edit::de::Error) -> Self {
    VizError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<ConfigError> for VizError {
  fn from(err: ConfigError) -> Self {
    VizError::Config(err)
  }
}

impl From<ImportError> for VizError {
  fn from(err: ImportError) -> Self {
    VizError::Import(err)
  }
}

impl From<NotFoundError> for VizError {
  fn from(err: NotFoundError) -> Self {
    VizError::NotFound(err)
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// A field that must be non-empty was empty
  EmptyField { field: String },

  /// A numeric layout setting was out of range
  InvalidValue { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    Some("Fix the value in crd-graph.toml, or delete the file to use the defaults.".to_string())
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::EmptyField { field } => write!(f, "Config field '{}' must not be empty", field),
      ConfigError::InvalidValue { field, reason } => write!(f, "Invalid config value for '{}': {}", field, reason),
    }
  }
}

/// Errors raised while importing documents into the store
#[derive(Debug)]
pub enum ImportError {
  /// Content is neither valid JSON nor valid YAML
  Parse { source_name: String, reason: String },

  /// No documents found in the input
  Empty { source_name: String },

  /// A document is not an object
  NotAnObject { index: usize },

  /// A resource document is missing a required field
  MissingField { index: usize, field: &'static str },

  /// A document has the right shape but fails typed decoding
  Malformed { index: usize, reason: String },
}

impl ImportError {
  fn help_message(&self) -> Option<String> {
    match self {
      ImportError::MissingField { .. } => {
        Some("Every resource document needs both 'kind' and 'apiVersion'. Nothing was imported.".to_string())
      }
      ImportError::Empty { .. } => Some("Separate multiple YAML documents with '---'.".to_string()),
      _ => Some("Nothing was imported; the store is unchanged.".to_string()),
    }
  }
}

impl fmt::Display for ImportError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ImportError::Parse { source_name, reason } => {
        write!(f, "Failed to parse {} as JSON or YAML: {}", source_name, reason)
      }
      ImportError::Empty { source_name } => write!(f, "No valid documents found in {}", source_name),
      ImportError::NotAnObject { index } => {
        write!(f, "Document #{} does not contain valid data (expected an object)", index + 1)
      }
      ImportError::MissingField { index, field } => {
        write!(f, "Document #{}: resource must have a '{}' field", index + 1, field)
      }
      ImportError::Malformed { index, reason } => write!(f, "Document #{}: {}", index + 1, reason),
    }
  }
}

/// Unknown id on lookup or delete
#[derive(Debug)]
pub enum NotFoundError {
  Definition { id: String },
  Instance { id: String },
  Mapping { id: String },
  Node { id: String },
  Kind { kind: String },
}

impl NotFoundError {
  fn help_message(&self) -> Option<String> {
    match self {
      NotFoundError::Definition { .. } | NotFoundError::Kind { .. } => {
        Some("List known definitions with `crd-graph definitions`.".to_string())
      }
      NotFoundError::Instance { .. } => Some("List instances with `crd-graph list`.".to_string()),
      NotFoundError::Mapping { .. } => Some("List mappings with `crd-graph mapping list`.".to_string()),
      NotFoundError::Node { .. } => Some("Node ids are shown by `crd-graph graph`.".to_string()),
    }
  }
}

impl fmt::Display for NotFoundError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      NotFoundError::Definition { id } => write!(f, "Definition '{}' not found", id),
      NotFoundError::Instance { id } => write!(f, "Instance '{}' not found", id),
      NotFoundError::Mapping { id } => write!(f, "Mapping '{}' not found", id),
      NotFoundError::Node { id } => write!(f, "Graph node '{}' not found", id),
      NotFoundError::Kind { kind } => write!(f, "No definition for kind '{}'", kind),
    }
  }
}

/// Result type alias for crd-graph
pub type VizResult<T> = Result<T, VizError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> VizResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> VizResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<VizError>,
{
  fn context(self, ctx: impl Into<String>) -> VizResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> VizResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &VizError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

impl From<anyhow::Error> for VizError {
  fn from(err: anyhow::Error) -> Self {
    VizError::message(err.to_string())
  }
}
