//! Arena-backed forest of tariff nodes.

use std::fmt;

use generational_arena::{Arena, Index};
use serde::{Deserialize, Serialize};
use termtree::Tree;
use tracing::instrument;

use crate::domain::entities::Candidate;
use crate::domain::row::Row;

/// Data payload for tree nodes: one tariff line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Declared indentation level from the source table
    pub level: u32,
    /// HS code, absent for pure grouping lines
    pub code: Option<String>,
    /// Primary-language description
    pub local_text: String,
    /// Secondary-language description
    pub alt_text: String,
}

impl From<&Row> for NodeData {
    fn from(row: &Row) -> Self {
        Self {
            level: row.level,
            code: row.code.clone(),
            local_text: row.local_text.clone(),
            alt_text: row.alt_text.clone(),
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{}  {}", code, self.local_text),
            None => write!(f, "{}", self.local_text),
        }
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for chapter roots
    pub parent: Option<Index>,
    /// Indices of child nodes in sibling order
    pub children: Vec<Index>,
}

/// Nested, serializable form of a node: `{level, code, localText, altText, children}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HsNode {
    pub level: u32,
    pub code: Option<String>,
    pub local_text: String,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default)]
    pub children: Vec<HsNode>,
}

/// Arena-based forest holding the whole tariff hierarchy.
///
/// Every node is owned by the arena; parents reference children by index and
/// the ordered root list holds the chapters.
#[derive(Debug, Default)]
pub struct HsTree {
    arena: Arena<TreeNode>,
    roots: Vec<Index>,
}

impl HsTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under `parent`, or as a new root when `parent` is None.
    /// Insertion order is sibling order.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent_node) => parent_node.children.push(node_idx),
            None => self.roots.push(node_idx),
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order walk over the whole forest, roots in order.
    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, &self.roots)
    }

    /// Pre-order walk over the descendants of `idx`, excluding `idx` itself.
    pub fn descendants(&self, idx: Index) -> PreOrderIterator<'_> {
        match self.get_node(idx) {
            Some(node) => PreOrderIterator::new(self, &node.children),
            None => PreOrderIterator::new(self, &[]),
        }
    }

    /// First node in pre-order whose code equals `code`.
    #[instrument(level = "trace", skip(self))]
    pub fn find_by_code(&self, code: &str) -> Option<Index> {
        self.iter()
            .find(|(_, node)| node.data.code.as_deref() == Some(code))
            .map(|(idx, _)| idx)
    }

    /// Flatten everything below the node carrying `code` into candidate records.
    ///
    /// Parents come before their children, siblings keep table order, the
    /// matched node itself is excluded. Unknown codes give an empty list.
    #[instrument(level = "debug", skip(self))]
    pub fn flatten_descendants(&self, code: &str) -> Vec<Candidate> {
        match self.find_by_code(code) {
            Some(idx) => self
                .descendants(idx)
                .map(|(_, node)| Candidate::from(&node.data))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Number of levels in the deepest branch, 0 for an empty forest.
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .filter_map(|&root| {
                self.fold_subtree(root, |_, depths: Vec<usize>| {
                    1 + depths.into_iter().max().unwrap_or(0)
                })
            })
            .max()
            .unwrap_or(0)
    }

    /// Post-order fold over the subtree at `root`: `f` receives a node and the
    /// folded values of its children, in sibling order.
    ///
    /// Uses an explicit stack, so arbitrarily deep chains do not grow the call stack.
    pub fn fold_subtree<T>(&self, root: Index, f: impl Fn(&TreeNode, Vec<T>) -> T) -> Option<T> {
        struct Frame<'a, T> {
            node: &'a TreeNode,
            next: usize,
            folded: Vec<T>,
        }

        let mut stack = vec![Frame {
            node: self.get_node(root)?,
            next: 0,
            folded: Vec::new(),
        }];

        loop {
            let child = {
                let frame = stack.last_mut()?;
                let child = frame.node.children.get(frame.next).copied();
                if child.is_some() {
                    frame.next += 1;
                }
                child
            };

            if let Some(child) = child {
                if let Some(node) = self.get_node(child) {
                    stack.push(Frame {
                        node,
                        next: 0,
                        folded: Vec::new(),
                    });
                }
                continue;
            }

            let done = stack.pop()?;
            let value = f(done.node, done.folded);
            match stack.last_mut() {
                Some(parent) => parent.folded.push(value),
                None => return Some(value),
            }
        }
    }

    /// Convert to the nested serializable form.
    pub fn to_nodes(&self) -> Vec<HsNode> {
        self.roots.iter().filter_map(|&r| self.to_node(r)).collect()
    }

    fn to_node(&self, idx: Index) -> Option<HsNode> {
        self.fold_subtree(idx, |node, children: Vec<HsNode>| HsNode {
            level: node.data.level,
            code: node.data.code.clone(),
            local_text: node.data.local_text.clone(),
            alt_text: node.data.alt_text.clone(),
            children,
        })
    }

    /// Rebuild an arena from nested records, keeping their nesting as is.
    pub fn from_nodes(nodes: &[HsNode]) -> Self {
        let mut tree = Self::new();
        let mut stack: Vec<(&HsNode, Option<Index>)> =
            nodes.iter().rev().map(|n| (n, None)).collect();

        while let Some((node, parent)) = stack.pop() {
            let data = NodeData {
                level: node.level,
                code: node.code.clone(),
                local_text: node.local_text.clone(),
                alt_text: node.alt_text.clone(),
            };
            let idx = tree.insert_node(data, parent);
            for child in node.children.iter().rev() {
                stack.push((child, Some(idx)));
            }
        }

        tree
    }

    /// Render the forest, or the subtree rooted at `code`, for the terminal.
    /// Returns None when `code` is given but not present.
    pub fn to_tree_string(&self, code: Option<&str>) -> Option<Tree<String>> {
        let build = |idx: Index| {
            self.fold_subtree(idx, |node, leaves: Vec<Tree<String>>| {
                Tree::new(node.data.to_string()).with_leaves(leaves)
            })
        };

        match code {
            Some(code) => self.find_by_code(code).and_then(build),
            None => {
                let leaves: Vec<_> = self.roots.iter().filter_map(|&r| build(r)).collect();
                Some(Tree::new("HS".to_string()).with_leaves(leaves))
            }
        }
    }
}

/// Depth-first, parent-before-children iterator over arena nodes.
pub struct PreOrderIterator<'a> {
    tree: &'a HsTree,
    stack: Vec<Index>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(tree: &'a HsTree, starts: &[Index]) -> Self {
        // Reverse so the first start is popped first
        let stack = starts.iter().rev().copied().collect();
        Self { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
