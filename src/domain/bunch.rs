use std::fmt;

use generational_arena::{Arena, Index};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::record::NodeStatus;

/// Role of a node inside a workflow suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Root,
    Family,
    Task,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Root => "root",
            NodeType::Family => "family",
            NodeType::Task => "task",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node in a bunch: one suite, family or task of a single day.
#[derive(Debug, Clone)]
pub struct BunchNode {
    /// Last path segment, empty for the root
    pub name: String,
    /// Absolute node path, `/` for the root
    pub path: String,
    pub node_type: NodeType,
    /// Last status observed for the node, if any
    pub status: Option<NodeStatus>,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes, ordered by name
    pub children: Vec<Index>,
}

/// Arena-backed tree holding one day's workflow node hierarchy.
///
/// The root always exists and has path `/`. Intermediate nodes are created on
/// demand as families; callers promote leaves to tasks.
#[derive(Debug)]
pub struct Bunch {
    arena: Arena<BunchNode>,
    root: Index,
}

impl Default for Bunch {
    fn default() -> Self {
        Self::new()
    }
}

impl Bunch {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(BunchNode {
            name: String::new(),
            path: "/".to_string(),
            node_type: NodeType::Root,
            status: None,
            parent: None,
            children: Vec::new(),
        });
        Self { arena, root }
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn get_node(&self, idx: Index) -> Option<&BunchNode> {
        self.arena.get(idx)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root_node().children.is_empty()
    }

    fn root_node(&self) -> &BunchNode {
        &self.arena[self.root]
    }

    /// Add a node by absolute path, creating missing ancestors as families.
    ///
    /// Adding an existing path returns its index unchanged.
    #[instrument(level = "trace", skip(self))]
    pub fn add_node(&mut self, path: &str) -> DomainResult<Index> {
        let segments = split_path(path)?;
        let mut current = self.root;
        for (depth, segment) in segments.iter().enumerate() {
            current = match self.find_child(current, segment) {
                Some(child) => child,
                None => {
                    let child_path = format!("/{}", segments[..=depth].join("/"));
                    self.insert_child(current, segment, child_path)
                }
            };
        }
        Ok(current)
    }

    /// Look up a node by absolute path.
    pub fn find(&self, path: &str) -> Option<Index> {
        let segments = split_path(path).ok()?;
        segments
            .iter()
            .try_fold(self.root, |idx, segment| self.find_child(idx, segment))
    }

    pub fn set_node_type(&mut self, idx: Index, node_type: NodeType) {
        if let Some(node) = self.arena.get_mut(idx) {
            if node.node_type != NodeType::Root {
                node.node_type = node_type;
            }
        }
    }

    pub fn set_status(&mut self, idx: Index, status: NodeStatus) {
        if let Some(node) = self.arena.get_mut(idx) {
            node.status = Some(status);
        }
    }

    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, idx: Index) -> usize {
        self.get_node(idx)
            .map(|node| {
                1 + node
                    .children
                    .iter()
                    .map(|&child| self.calculate_depth(child))
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }

    /// Convert the tree into a plain JSON dictionary.
    pub fn to_value(&self) -> Value {
        self.node_to_value(self.root)
    }

    fn node_to_value(&self, idx: Index) -> Value {
        let node = &self.arena[idx];
        let children: Vec<Value> = node
            .children
            .iter()
            .map(|&child| self.node_to_value(child))
            .collect();
        json!({
            "name": node.name,
            "path": node.path,
            "node_type": node.node_type,
            "status": node.status,
            "children": children,
        })
    }

    fn find_child(&self, parent: Index, name: &str) -> Option<Index> {
        self.arena[parent]
            .children
            .iter()
            .copied()
            .find(|&child| self.arena[child].name == name)
    }

    fn insert_child(&mut self, parent: Index, name: &str, path: String) -> Index {
        let idx = self.arena.insert(BunchNode {
            name: name.to_string(),
            path,
            node_type: NodeType::Family,
            status: None,
            parent: Some(parent),
            children: Vec::new(),
        });

        // keep siblings ordered by name
        let position = {
            let arena = &self.arena;
            arena[parent]
                .children
                .partition_point(|&sibling| arena[sibling].name.as_str() < name)
        };
        self.arena[parent].children.insert(position, idx);
        idx
    }
}

fn split_path(path: &str) -> DomainResult<Vec<&str>> {
    let rest = path
        .strip_prefix('/')
        .ok_or_else(|| DomainError::InvalidNodePath(path.to_string()))?;
    if rest.is_empty() {
        return Ok(Vec::new());
    }
    let segments: Vec<&str> = rest.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(DomainError::InvalidNodePath(path.to_string()));
    }
    Ok(segments)
}
