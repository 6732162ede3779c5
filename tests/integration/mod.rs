//! Binary-level tests: each runs the compiled crd-graph in a fresh temp directory

mod helpers;

mod test_graph;
mod test_import;
mod test_mapping;
mod test_search;
mod test_store;
