//! Input tree model and the arena the layout passes walk.
//!
//! [`TreeNode`] mirrors the JSON the indexing service emits and is treated as
//! read-only.  [`LayoutTree`] is built from it once per layout pass: it holds
//! the nodes in pre-order, links them by index, and resolves every node's
//! [`NodeId`] through [`synthesize_id`].  Width, level, position and edge
//! passes all read ids from the arena, so they cannot disagree about which
//! node an id names.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::LayoutError;

// ───────────────────────────────────────── input model ───────

/// Free-form key/value metadata attached to a node, passed through untouched.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// One node of the externally supplied tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TreeNode {
    /// Service-provided identifier.  Neither present nor unique in general.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub label: String,
    /// Ordered children; order decides left-to-right placement.
    #[serde(default)]
    pub children: Vec<TreeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl TreeNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }
}

/// Which index structure the service visualised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexType {
    Suffix,
    Patricia,
}

impl IndexType {
    pub fn label(self) -> &'static str {
        match self {
            IndexType::Suffix => "suffix tree",
            IndexType::Patricia => "PATRICIA tree",
        }
    }
}

/// The service's structure response.  Only `root` feeds the layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndexStructure {
    pub index_type: IndexType,
    #[serde(default)]
    pub root: Option<TreeNode>,
    #[serde(default)]
    pub stats: serde_json::Map<String, serde_json::Value>,
}

// ───────────────────────────────────────── identity ──────────

/// Child-index path from the root: `r`, `r.0`, `r.0.2`, ...
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut steps = self.0.clone();
        steps.push(index);
        Self(steps)
    }

    /// Number of edges between the root and this path's node.
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("r")?;
        for step in &self.0 {
            write!(f, ".{step}")?;
        }
        Ok(())
    }
}

/// Resolved identifier of a node within one layout pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The id rule: a non-empty service id verbatim, otherwise `node:<path>`.
///
/// Does not consider other nodes; [`LayoutTree::build`] disambiguates
/// duplicates on top of this.
pub fn synthesize_id(node: &TreeNode, path: &NodePath) -> NodeId {
    match node.id.as_deref() {
        Some(id) if !id.is_empty() => NodeId(id.to_string()),
        _ => NodeId(format!("node:{path}")),
    }
}

// ───────────────────────────────────────── arena ─────────────

/// Index into [`LayoutTree::nodes`].
pub type NodeIndex = usize;

/// One arena slot.
#[derive(Debug, Clone)]
pub struct LayoutNode<'a> {
    pub id: NodeId,
    pub path: NodePath,
    pub children: Vec<NodeIndex>,
    /// The input node this slot stands for.
    pub source: &'a TreeNode,
}

/// Pre-order arena over a borrowed [`TreeNode`] tree.
#[derive(Debug, Clone)]
pub struct LayoutTree<'a> {
    pub nodes: Vec<LayoutNode<'a>>,
    pub root: NodeIndex,
}

impl<'a> LayoutTree<'a> {
    /// Walk `root` once, assigning every node a distinct id.
    ///
    /// Fails with [`LayoutError::MalformedTree`] when a node sits deeper than
    /// `max_depth`.
    pub fn build(root: &'a TreeNode, max_depth: usize) -> Result<Self, LayoutError> {
        let mut tree = Self {
            nodes: Vec::new(),
            root: 0,
        };
        let mut taken = HashSet::new();
        tree.insert(root, NodePath::root(), max_depth, &mut taken)?;
        Ok(tree)
    }

    fn insert(
        &mut self,
        node: &'a TreeNode,
        path: NodePath,
        max_depth: usize,
        taken: &mut HashSet<NodeId>,
    ) -> Result<NodeIndex, LayoutError> {
        if path.depth() > max_depth {
            return Err(LayoutError::MalformedTree {
                limit: max_depth,
                path: path.to_string(),
            });
        }

        // First claimant in pre-order keeps the plain id.
        let mut id = synthesize_id(node, &path);
        while !taken.insert(id.clone()) {
            id = NodeId(format!("{id}@{path}"));
        }

        let index = self.nodes.len();
        self.nodes.push(LayoutNode {
            id,
            path: path.clone(),
            children: Vec::with_capacity(node.children.len()),
            source: node,
        });

        for (i, child) in node.children.iter().enumerate() {
            let child_index = self.insert(child, path.child(i), max_depth, taken)?;
            self.nodes[index].children.push(child_index);
        }
        Ok(index)
    }

    pub fn get(&self, index: NodeIndex) -> &LayoutNode<'a> {
        &self.nodes[index]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}
