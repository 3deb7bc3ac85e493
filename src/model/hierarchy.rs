//! Three-level test hierarchy: module → class → test.
//!
//! Built once from discovery output and read-only afterwards. Display order
//! is first-discovery order, never alphabetical.

use super::identifier::TestIdentifier;
use std::collections::HashMap;

/// A runnable test, either a module-level function or a class method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode {
    /// Display label: the test name.
    pub name: String,
    /// Full identifier handed to the framework when this test runs.
    pub qualified_path: String,
}

/// A test class grouping its methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNode {
    /// Class name as discovered.
    pub name: String,
    /// `module::Class`.
    pub qualified_path: String,
    /// Methods in discovery order.
    pub children: Vec<LeafNode>,
}

/// Child of a module: either a class or a module-level test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleChild {
    /// A test class and its methods.
    Class(ClassNode),
    /// A module-level test function.
    Leaf(LeafNode),
}

impl ModuleChild {
    /// Display label of the child.
    pub fn name(&self) -> &str {
        match self {
            ModuleChild::Class(class) => &class.name,
            ModuleChild::Leaf(leaf) => &leaf.name,
        }
    }
}

/// A test module. Its qualified path is its own name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNode {
    /// Module path as discovered, e.g. `tests/test_x.py`.
    pub name: String,
    /// Classes and functions in discovery order.
    pub children: Vec<ModuleChild>,
}

impl ModuleNode {
    /// Target string that runs the whole module.
    pub fn qualified_path(&self) -> &str {
        &self.name
    }
}

/// Borrowed view of any node in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyNode<'a> {
    /// A module node.
    Module(&'a ModuleNode),
    /// A class node.
    Class(&'a ClassNode),
    /// A runnable test.
    Leaf(&'a LeafNode),
}

impl<'a> HierarchyNode<'a> {
    /// Display label of the node.
    pub fn name(&self) -> &'a str {
        match self {
            HierarchyNode::Module(module) => &module.name,
            HierarchyNode::Class(class) => &class.name,
            HierarchyNode::Leaf(leaf) => &leaf.name,
        }
    }

    /// Target string that runs exactly this node.
    pub fn qualified_path(&self) -> &'a str {
        match self {
            HierarchyNode::Module(module) => module.qualified_path(),
            HierarchyNode::Class(class) => &class.qualified_path,
            HierarchyNode::Leaf(leaf) => &leaf.qualified_path,
        }
    }
}

/// Root's children: the discovered modules in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestTree {
    /// Top-level modules, first-seen order.
    pub modules: Vec<ModuleNode>,
}

impl TestTree {
    /// Fold identifiers into a tree.
    ///
    /// Module and class nodes are created once each, on first sight. Leaves
    /// are never deduplicated: a repeated identifier yields two siblings.
    pub fn build<'a>(identifiers: impl IntoIterator<Item = &'a TestIdentifier>) -> Self {
        let mut modules: Vec<ModuleNode> = Vec::new();
        let mut module_index: HashMap<String, usize> = HashMap::new();
        let mut class_index: HashMap<(String, String), usize> = HashMap::new();

        for id in identifiers {
            let module_name = id.module_name();
            let m = *module_index
                .entry(module_name.to_string())
                .or_insert_with(|| {
                    modules.push(ModuleNode {
                        name: module_name.to_string(),
                        children: Vec::new(),
                    });
                    modules.len() - 1
                });
            let module = &mut modules[m];

            match (id.class_name(), id.test_name()) {
                (Some(class_name), test) => {
                    let key = (module_name.to_string(), class_name.to_string());
                    let c = *class_index.entry(key).or_insert_with(|| {
                        module.children.push(ModuleChild::Class(ClassNode {
                            name: class_name.to_string(),
                            qualified_path: id.class_path().unwrap_or_default(),
                            children: Vec::new(),
                        }));
                        module.children.len() - 1
                    });
                    if let (Some(test), ModuleChild::Class(class)) = (test, &mut module.children[c])
                    {
                        class.children.push(LeafNode {
                            name: test.to_string(),
                            qualified_path: id.to_string(),
                        });
                    }
                }
                (None, Some(test)) => module.children.push(ModuleChild::Leaf(LeafNode {
                    name: test.to_string(),
                    qualified_path: id.to_string(),
                })),
                // module-only discovery line
                (None, None) => {}
            }
        }

        Self { modules }
    }

    /// True when discovery found nothing.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Number of runnable leaves.
    pub fn leaf_count(&self) -> usize {
        self.modules
            .iter()
            .flat_map(|m| &m.children)
            .map(|child| match child {
                ModuleChild::Class(class) => class.children.len(),
                ModuleChild::Leaf(_) => 1,
            })
            .sum()
    }

    /// Depth-first walk in display order, yielding `(depth, node)` with
    /// modules at depth 1 (depth 0 is the synthetic root).
    pub fn walk(&self) -> Vec<(usize, HierarchyNode<'_>)> {
        let mut out = Vec::new();
        for module in &self.modules {
            out.push((1, HierarchyNode::Module(module)));
            for child in &module.children {
                match child {
                    ModuleChild::Class(class) => {
                        out.push((2, HierarchyNode::Class(class)));
                        out.extend(class.children.iter().map(|l| (3, HierarchyNode::Leaf(l))));
                    }
                    ModuleChild::Leaf(leaf) => out.push((2, HierarchyNode::Leaf(leaf))),
                }
            }
        }
        out
    }
}
