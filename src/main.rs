mod commands;
mod core;
mod graph;
mod model;
mod store;

use clap::{Parser, Subcommand};
use core::error::{VizError, print_error};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `CRD_GRAPH_LOG=debug`)
const LOG_ENV: &str = "CRD_GRAPH_LOG";

/// Infer and explore relationships between Kubernetes custom resources
#[derive(Parser)]
#[command(name = "crd-graph")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Log debug output to stderr
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Views
  // ============================================================================
  /// Show the inferred relationship graph
  Graph {
    /// Only include instances of this kind
    #[arg(long)]
    kind: Option<String>,
    /// Only include instances in this namespace
    #[arg(long)]
    namespace: Option<String>,
    /// Output format: text (default), json, dot
    #[arg(long, default_value = "text")]
    format: String,
  },

  /// List instances
  List {
    /// Only list instances of this kind
    #[arg(long)]
    kind: Option<String>,
    /// Only list instances in this namespace
    #[arg(long)]
    namespace: Option<String>,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Print instances as raw JSON
  Raw {
    /// Only print instances of this kind
    #[arg(long)]
    kind: Option<String>,
    /// Only print instances in this namespace
    #[arg(long)]
    namespace: Option<String>,
  },

  /// List the namespaces used by a kind
  Namespaces {
    /// Resource kind (e.g. Application)
    kind: String,
  },

  /// Search graph nodes
  Search {
    /// Text to look for (blank matches nothing)
    term: String,
    /// Search mode: name (default), field, dependencies
    #[arg(long, default_value = "name")]
    mode: String,
    /// Field path for field mode (e.g. spec.serviceName)
    #[arg(long)]
    field: Option<String>,
    /// In dependencies mode, leave out directly connected nodes
    #[arg(long)]
    no_connected: bool,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Show everything a node depends on or is depended on by
  Chain {
    /// Graph node id (as shown by `graph`)
    node_id: String,
    /// Direction: both (default), incoming, outgoing
    #[arg(long, default_value = "both")]
    direction: String,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// List definitions, or the fields of one kind
  Definitions {
    #[command(subcommand)]
    command: Option<DefinitionCommands>,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Show store and graph status
  Status {
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  // ============================================================================
  // Editing
  // ============================================================================
  /// Manage field mappings
  #[command(subcommand)]
  Mapping(MappingCommands),

  /// Delete a definition or instance by uid
  #[command(subcommand)]
  Delete(DeleteCommands),

  /// Import JSON or YAML documents (`-` for stdin)
  Import {
    /// File to import, or `-` for standard input
    source: String,
  },

  /// Export all data as YAML
  Export {
    /// Output file (default: crd-graph-data.yaml)
    #[arg(short, long, conflicts_with = "stdout")]
    output: Option<PathBuf>,
    /// Write to standard output instead of a file
    #[arg(long)]
    stdout: bool,
  },

  /// Discard saved data and restore the demo dataset
  Reset,
}

#[derive(Subcommand)]
enum DefinitionCommands {
  /// Fields of a kind usable in mappings
  Fields {
    /// Resource kind (e.g. IngressRoute)
    kind: String,
  },
}

#[derive(Subcommand)]
enum MappingCommands {
  /// Add a mapping between two kinds
  Add {
    /// Mapping name, shown as the edge label
    #[arg(long)]
    name: String,
    /// Kind providing the source field
    #[arg(long)]
    source_kind: String,
    /// Source field path (e.g. spec.routes[0].services[0].name)
    #[arg(long)]
    source_field: String,
    /// Kind providing the target field
    #[arg(long)]
    target_kind: String,
    /// Target field path (e.g. metadata.name)
    #[arg(long)]
    target_field: String,
    /// Free-form description
    #[arg(long)]
    description: Option<String>,
  },

  /// List mappings
  List {
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Delete a mapping by id
  Delete {
    /// Mapping id (from `mapping list`)
    id: String,
  },
}

#[derive(Subcommand)]
enum DeleteCommands {
  /// Delete a definition
  Definition {
    /// Definition uid
    uid: String,
  },
  /// Delete an instance
  Instance {
    /// Instance uid
    uid: String,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Cyan))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Cyan))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

/// Logs go to stderr so JSON and DOT output on stdout stay clean
fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  // Config and store are loaded once and shared by every command
  let mut ctx = match core::context::AppContext::build(&root) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    // Views
    Commands::Graph {
      kind,
      namespace,
      format,
    } => commands::run_graph(&ctx, kind, namespace, format),
    Commands::List { kind, namespace, json } => commands::run_list(&ctx, kind, namespace, json),
    Commands::Raw { kind, namespace } => commands::run_raw(&ctx, kind, namespace),
    Commands::Namespaces { kind } => commands::run_namespaces(&ctx, kind),
    Commands::Search {
      term,
      mode,
      field,
      no_connected,
      json,
    } => commands::run_search(&ctx, term, mode, field, no_connected, json),
    Commands::Chain {
      node_id,
      direction,
      json,
    } => commands::run_chain(&ctx, node_id, direction, json),
    Commands::Definitions { command, json } => match command {
      Some(DefinitionCommands::Fields { kind }) => commands::run_definition_fields(&ctx, kind),
      None => commands::run_definitions(&ctx, json),
    },
    Commands::Status { json } => commands::run_status(&ctx, json),

    // Editing
    Commands::Mapping(mapping_cmd) => match mapping_cmd {
      MappingCommands::Add {
        name,
        source_kind,
        source_field,
        target_kind,
        target_field,
        description,
      } => commands::run_mapping_add(
        &mut ctx,
        commands::NewMapping {
          name,
          source_kind,
          source_field,
          target_kind,
          target_field,
          description,
        },
      ),
      MappingCommands::List { json } => commands::run_mapping_list(&ctx, json),
      MappingCommands::Delete { id } => commands::run_mapping_delete(&mut ctx, id),
    },
    Commands::Delete(delete_cmd) => match delete_cmd {
      DeleteCommands::Definition { uid } => commands::run_delete_definition(&mut ctx, uid),
      DeleteCommands::Instance { uid } => commands::run_delete_instance(&mut ctx, uid),
    },
    Commands::Import { source } => commands::run_import(&mut ctx, source),
    Commands::Export { output, stdout } => commands::run_export(&ctx, output, stdout),
    Commands::Reset => commands::run_reset(&mut ctx),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: VizError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
