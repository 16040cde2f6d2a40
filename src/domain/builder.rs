//! Tree builder: reconstructs the tariff hierarchy from leveled rows.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::{HsTree, NodeData};
use crate::domain::error::DomainResult;
use crate::domain::row::{leveled_rows, RawRow, Row, RowPolicy};

/// Constructs the tariff forest from a pre-order listing of leveled rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeBuilder {
    policy: RowPolicy,
}

impl TreeBuilder {
    pub fn new(policy: RowPolicy) -> Self {
        Self { policy }
    }

    /// Build the forest from raw table rows.
    #[instrument(level = "debug", skip(self, raw), fields(rows = raw.len()))]
    pub fn build(&self, raw: &[RawRow]) -> DomainResult<HsTree> {
        let rows = leveled_rows(raw, self.policy)?;
        Ok(Self::build_from_rows(&rows))
    }

    /// Stack-based construction over typed rows.
    ///
    /// The stack holds the currently open ancestors. Before attaching a row,
    /// every open node at the same or a deeper level is closed, so a jump of
    /// several levels still attaches to the nearest shallower node.
    pub fn build_from_rows(rows: &[Row]) -> HsTree {
        let mut tree = HsTree::new();
        let mut stack: Vec<(Index, u32)> = Vec::new();

        for row in rows {
            while stack.last().is_some_and(|&(_, level)| level >= row.level) {
                stack.pop();
            }

            let parent = stack.last().map(|&(idx, _)| idx);
            let idx = tree.insert_node(NodeData::from(row), parent);
            stack.push((idx, row.level));
        }

        debug!(
            "built forest: {} nodes, {} roots",
            tree.len(),
            tree.roots().len()
        );
        tree
    }
}
