//! Flattened, display-ordered rows of the test tree.
//!
//! The tree is shown fully expanded under a synthetic root row. The root is a
//! distinct [`RowTarget::Root`] marker rather than a label to compare against.

use crate::model::{HierarchyNode, TestTree};

/// Label of the synthetic root row.
pub const ROOT_LABEL: &str = "Tests";

/// What running a row would execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowTarget {
    /// The synthetic root: nothing to run.
    Root,
    /// A framework target path (module, `module::Class` or full test id).
    Path(String),
}

/// Kind of node a row displays, for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// The synthetic `Tests` row.
    Root,
    /// A test module.
    Module,
    /// A test class.
    Class,
    /// A single test.
    Leaf,
}

/// One visible line of the tree pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    /// Nesting level; the root is 0.
    pub depth: usize,
    /// Text shown for the row.
    pub label: String,
    /// Node kind, for styling.
    pub kind: RowKind,
    /// What `r` runs on this row.
    pub target: RowTarget,
}

impl TreeRow {
    fn root() -> Self {
        Self {
            depth: 0,
            label: ROOT_LABEL.to_string(),
            kind: RowKind::Root,
            target: RowTarget::Root,
        }
    }

    fn from_node(depth: usize, node: HierarchyNode<'_>) -> Self {
        let kind = match node {
            HierarchyNode::Module(_) => RowKind::Module,
            HierarchyNode::Class(_) => RowKind::Class,
            HierarchyNode::Leaf(_) => RowKind::Leaf,
        };
        Self {
            depth,
            label: node.name().to_string(),
            kind,
            target: RowTarget::Path(node.qualified_path().to_string()),
        }
    }
}

/// Root row followed by every node in depth-first display order.
pub fn flatten(tree: &TestTree) -> Vec<TreeRow> {
    std::iter::once(TreeRow::root())
        .chain(
            tree.walk()
                .into_iter()
                .map(|(depth, node)| TreeRow::from_node(depth, node)),
        )
        .collect()
}
