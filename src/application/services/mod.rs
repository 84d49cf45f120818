//! Application services

pub mod node_tree;

pub use node_tree::NodeTreeService;
