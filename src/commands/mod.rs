//! CLI commands for crd-graph
//!
//! ## Views
//! - **graph**: Inferred relationship graph (text, JSON or Graphviz DOT)
//! - **view**: List, raw JSON and namespace views of instances
//! - **search**: Node search and dependency chains
//! - **definitions**: Known definitions and their mappable fields
//! - **status**: Store and graph overview
//!
//! ## Editing
//! - **mapping**: Add, list and delete field mappings
//! - **delete**: Remove definitions and instances by uid
//! - **transfer**: Import, export and reset
//!
//! All commands take the `AppContext` built once in main.

pub mod definitions;
pub mod delete;
pub mod graph;
pub mod mapping;
pub mod search;
pub mod status;
pub mod transfer;
pub mod view;

pub use definitions::{run_definition_fields, run_definitions};
pub use delete::{run_delete_definition, run_delete_instance};
pub use graph::run_graph;
pub use mapping::{NewMapping, run_mapping_add, run_mapping_delete, run_mapping_list};
pub use search::{run_chain, run_search};
pub use status::run_status;
pub use transfer::{run_export, run_import, run_reset};
pub use view::{run_list, run_namespaces, run_raw};
