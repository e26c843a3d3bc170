//! Callback-style tree walking, supplementing the arena-based iterators in
//! `tree::iter` for callers who'd rather push than pull (spec §4.4
//! "Iteration", supplemented per `SPEC_FULL.md` §E). Every method has a
//! no-op default so implementors only override what they care about.

use crate::tree::node::NodeId;
use crate::tree::EventTree;

pub trait EventVisitor {
    /// Called once per event, before any structure in it is visited.
    fn start_event(&mut self, _tree: &EventTree) {}

    /// Called before descending into a container's children. Returning
    /// `false` skips the subtree (but still calls `end_structure` for
    /// symmetry).
    fn start_structure(&mut self, _tree: &EventTree, _id: NodeId) -> bool {
        true
    }

    fn end_structure(&mut self, _tree: &EventTree, _id: NodeId) {}

    /// Called for every leaf (non-container) structure.
    fn visit_leaf(&mut self, _tree: &EventTree, _id: NodeId) {}

    fn end_event(&mut self, _tree: &EventTree) {}
}

/// Drives `visitor` depth-first over `tree`, honoring `start_structure`'s
/// skip signal.
pub fn walk(tree: &EventTree, visitor: &mut dyn EventVisitor) {
    visitor.start_event(tree);
    walk_node(tree, tree.root(), visitor);
    visitor.end_event(tree);
}

fn walk_node(tree: &EventTree, id: NodeId, visitor: &mut dyn EventVisitor) {
    let node = tree.node(id);
    if node.is_leaf() {
        visitor.visit_leaf(tree, id);
        return;
    }
    if !visitor.start_structure(tree, id) {
        visitor.end_structure(tree, id);
        return;
    }
    let children = node.children.clone();
    for child in children {
        walk_node(tree, child, visitor);
    }
    visitor.end_structure(tree, id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::DataType;
    use crate::tree::node::StructureKind;
    use crate::tree::payload::Payload;

    #[derive(Default)]
    struct CountingVisitor {
        leaves: usize,
        containers: usize,
    }

    impl EventVisitor for CountingVisitor {
        fn visit_leaf(&mut self, _tree: &EventTree, _id: NodeId) {
            self.leaves += 1;
        }
        fn start_structure(&mut self, _tree: &EventTree, _id: NodeId) -> bool {
            self.containers += 1;
            true
        }
    }

    #[test]
    fn visits_every_leaf_and_container() {
        let mut tree = EventTree::new_bank(1, DataType::Bank, 0);
        let root = tree.root();
        let child = tree.add_child(root, StructureKind::Bank, 2, DataType::Int32, 0).unwrap();
        tree.set_payload(child, Payload::Int32(vec![1, 2])).unwrap();

        let mut visitor = CountingVisitor::default();
        walk(&tree, &mut visitor);
        assert_eq!(visitor.leaves, 1);
        assert_eq!(visitor.containers, 1);
    }
}
