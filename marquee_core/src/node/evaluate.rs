// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame evaluation and change tracking.
//!
//! Evaluation follows a drain-recompute pattern for each dirty channel:
//!
//! 1. **POSE** — Drain dirty indices, recompute each node's `world_pose` as
//!    `parent_world * local_pose` and `effective_hidden` as
//!    `parent_effective_hidden || flags.hidden`.
//! 2. **COLOR** — Drain dirty indices, recompute each node's `world_color`
//!    (local rgb, alpha multiplied through ancestors).
//! 3. **CONTENT** — Drain dirty indices (no recomputation; renderers read
//!    the current values directly from the store).
//! 4. **TOPOLOGY** — Drain and discard (the traversal order was already
//!    rebuilt at the start of evaluation if needed).
//!
//! [`FrameChanges`] uses raw slot indices (`u32`) rather than handles so the
//! surface-plan builder can index directly into the store's SoA arrays via
//! the `*_at()` accessors without paying for generation checks per access.

use crate::dirty;
use crate::math::Pose;

use super::id::INVALID;
use super::store::NodeStore;

/// The set of changes produced by a single [`NodeStore::evaluate`] call.
///
/// Each field contains the raw slot indices of nodes that changed in the
/// corresponding category. The surface-plan builder uses these to decide
/// whether a rebuild is needed at all.
#[derive(Clone, Debug, Default)]
pub struct FrameChanges {
    /// Nodes whose world pose was recomputed.
    pub poses: Vec<u32>,
    /// Nodes whose world color was recomputed.
    pub colors: Vec<u32>,
    /// Nodes whose text, bounds, or surface reference changed.
    pub content: Vec<u32>,
    /// Nodes that transitioned from visible to effectively hidden.
    pub hidden: Vec<u32>,
    /// Nodes that transitioned from effectively hidden to visible.
    pub unhidden: Vec<u32>,
    /// Nodes added since the last evaluate.
    pub added: Vec<u32>,
    /// Nodes removed since the last evaluate.
    pub removed: Vec<u32>,
    /// Whether the tree topology changed (traversal order was rebuilt).
    pub topology_changed: bool,
}

impl FrameChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.poses.clear();
        self.colors.clear();
        self.content.clear();
        self.hidden.clear();
        self.unhidden.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }

    /// Whether nothing changed at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
            && self.colors.is_empty()
            && self.content.is_empty()
            && self.hidden.is_empty()
            && self.unhidden.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.topology_changed
    }
}

impl NodeStore {
    /// Evaluates the node tree, recomputing dirty properties and returning
    /// the set of changes.
    pub fn evaluate(&mut self) -> FrameChanges {
        let mut changes = FrameChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut FrameChanges) {
        changes.clear();

        // Rebuild traversal order if needed.
        if self.traversal_dirty {
            self.rebuild_traversal_order();
            changes.topology_changed = true;
            self.traversal_dirty = false;
        }

        // Drain POSE channel — collect dirty indices, then recompute.
        let dirty_poses: Vec<u32> = self
            .dirty
            .drain(dirty::POSE)
            .affected()
            .deterministic()
            .run()
            .collect();
        for &idx in &dirty_poses {
            let parent_idx = self.parent[idx as usize];
            let parent_world = if parent_idx != INVALID {
                self.world_pose[parent_idx as usize]
            } else {
                Pose::IDENTITY
            };
            self.world_pose[idx as usize] = parent_world * self.local_pose[idx as usize];

            let parent_hidden = if parent_idx != INVALID {
                self.effective_hidden[parent_idx as usize]
            } else {
                false
            };
            let new_hidden = parent_hidden || self.flags[idx as usize].hidden;
            let old_hidden = self.effective_hidden[idx as usize];
            if new_hidden != old_hidden {
                if new_hidden {
                    changes.hidden.push(idx);
                } else {
                    changes.unhidden.push(idx);
                }
                self.effective_hidden[idx as usize] = new_hidden;
            }
        }
        changes.poses = dirty_poses;

        // Drain COLOR channel.
        let dirty_colors: Vec<u32> = self
            .dirty
            .drain(dirty::COLOR)
            .affected()
            .deterministic()
            .run()
            .collect();
        for &idx in &dirty_colors {
            let parent_alpha = if self.parent[idx as usize] != INVALID {
                self.world_color[self.parent[idx as usize] as usize].w
            } else {
                1.0
            };
            let local = self.color[idx as usize];
            self.world_color[idx as usize] =
                cgmath::Vector4::new(local.x, local.y, local.z, parent_alpha * local.w);
        }
        changes.colors = dirty_colors;

        // Drain CONTENT channel — no recomputation, just collect.
        changes.content = self
            .dirty
            .drain(dirty::CONTENT)
            .deterministic()
            .run()
            .collect();

        // Drain TOPOLOGY channel (just consume, changes are structural).
        let _: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();

        // Move lifecycle lists.
        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }

    /// Returns the current traversal order (depth-first pre-order).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called at least
    /// once.
    #[must_use]
    pub fn traversal_order(&self) -> &[u32] {
        &self.traversal_order
    }

    /// Rebuilds the depth-first pre-order traversal of all live nodes.
    fn rebuild_traversal_order(&mut self) {
        self.traversal_order.clear();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                self.dfs_collect(idx);
            }
        }
    }

    /// Depth-first pre-order collection starting from `idx`.
    fn dfs_collect(&mut self, idx: u32) {
        self.traversal_order.push(idx);
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.dfs_collect(child);
            child = self.next_sibling[child as usize];
        }
    }
}
