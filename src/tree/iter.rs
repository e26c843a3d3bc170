//! Depth-first and breadth-first iterators over an `EventTree` (spec §4.4).
//! Forward, single-pass, and bound to the tree's version counter at
//! construction time: any mutation during iteration is detected and turns
//! the next `next()` call into `None` rather than yielding stale data.

use crate::tree::node::NodeId;
use crate::tree::EventTree;
use std::collections::VecDeque;

/// Depth-first, pre-order iterator. Internally a stack of `(children,
/// index-into-children)` pairs per level, as spec.md describes.
pub struct DepthFirstIter<'a> {
    tree: &'a EventTree,
    version: u64,
    stack: Vec<(Vec<NodeId>, usize)>,
    poisoned: bool,
}

impl<'a> DepthFirstIter<'a> {
    pub(crate) fn new(tree: &'a EventTree, root: NodeId) -> Self {
        DepthFirstIter { tree, version: tree.version(), stack: vec![(vec![root], 0)], poisoned: false }
    }
}

impl<'a> Iterator for DepthFirstIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.poisoned || self.tree.version() != self.version {
            self.poisoned = true;
            return None;
        }
        loop {
            let (level, idx) = self.stack.last_mut()?;
            if *idx >= level.len() {
                self.stack.pop();
                continue;
            }
            let id = level[*idx];
            *idx += 1;
            let children = self.tree.node(id).children.clone();
            if !children.is_empty() {
                self.stack.push((children, 0));
            }
            return Some(id);
        }
    }
}

/// Breadth-first iterator, backed by a FIFO of the same `(siblings, index)`
/// pairs pushed per level.
pub struct BreadthFirstIter<'a> {
    tree: &'a EventTree,
    version: u64,
    queue: VecDeque<NodeId>,
    poisoned: bool,
}

impl<'a> BreadthFirstIter<'a> {
    pub(crate) fn new(tree: &'a EventTree, root: NodeId) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(root);
        BreadthFirstIter { tree, version: tree.version(), queue, poisoned: false }
    }
}

impl<'a> Iterator for BreadthFirstIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.poisoned || self.tree.version() != self.version {
            self.poisoned = true;
            return None;
        }
        let id = self.queue.pop_front()?;
        for &child in &self.tree.node(id).children {
            self.queue.push_back(child);
        }
        Some(id)
    }
}
