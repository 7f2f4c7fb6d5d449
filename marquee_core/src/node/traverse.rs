// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use crate::error::UiError;

use super::id::{INVALID, NodeHandle};
use super::store::NodeStore;

/// An iterator over the direct children of a node.
///
/// Created by [`NodeStore::children`].
#[derive(Debug)]
pub struct Children<'a> {
    store: &'a NodeStore,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a NodeStore, first: u32) -> Self {
        Self {
            store,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeHandle;

    fn next(&mut self) -> Option<NodeHandle> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.store.next_sibling[idx as usize];
        Some(NodeHandle {
            idx,
            generation: self.store.generation[idx as usize],
        })
    }
}

impl NodeStore {
    /// Collects the subtree rooted at `handle` in depth-first pre-order.
    ///
    /// This is the deterministic broadcast and hit-test order: a parent
    /// always precedes its children, siblings in attachment order.
    pub fn collect_subtree(&self, handle: NodeHandle) -> Result<Vec<NodeHandle>, UiError> {
        let root = self.resolve(handle)?;
        let mut out = Vec::new();
        self.preorder_into(root, &mut out);
        Ok(out)
    }

    fn preorder_into(&self, idx: u32, out: &mut Vec<NodeHandle>) {
        out.push(NodeHandle {
            idx,
            generation: self.generation[idx as usize],
        });
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.preorder_into(child, out);
            child = self.next_sibling[child as usize];
        }
    }

    /// Walks from `handle` up to its root, returning the root-to-node chain.
    pub fn path_from_root(&self, handle: NodeHandle) -> Result<Vec<NodeHandle>, UiError> {
        let mut idx = self.resolve(handle)?;
        let mut path = vec![NodeHandle {
            idx,
            generation: self.generation[idx as usize],
        }];
        while self.parent[idx as usize] != INVALID {
            idx = self.parent[idx as usize];
            path.push(NodeHandle {
                idx,
                generation: self.generation[idx as usize],
            });
        }
        path.reverse();
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_subtree_is_preorder() {
        let mut store = NodeStore::new();
        let a = store.create_node();
        let b = store.create_node();
        let c = store.create_node();
        let d = store.create_node();
        // Tree: a -> [b -> [d], c]
        store.add_child(a, b).unwrap();
        store.add_child(a, c).unwrap();
        store.add_child(b, d).unwrap();

        assert_eq!(store.collect_subtree(a).unwrap(), vec![a, b, d, c]);
        assert_eq!(store.collect_subtree(b).unwrap(), vec![b, d]);
    }

    #[test]
    fn path_from_root_is_root_to_leaf() {
        let mut store = NodeStore::new();
        let root = store.create_node();
        let mid = store.create_node();
        let leaf = store.create_node();
        store.add_child(root, mid).unwrap();
        store.add_child(mid, leaf).unwrap();

        assert_eq!(store.path_from_root(leaf).unwrap(), vec![root, mid, leaf]);
        assert_eq!(store.path_from_root(root).unwrap(), vec![root]);
    }
}
