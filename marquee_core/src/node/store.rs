// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, properties, and
//! component attachment.

use core::fmt;

use cgmath::{Vector3, Vector4};
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use crate::component::Component;
use crate::dirty;
use crate::error::UiError;
use crate::math::{Bounds, Pose};

use super::id::{INVALID, NodeHandle, SurfaceId};
use super::traverse::Children;

/// Per-node boolean flags.
///
/// Setting [`hidden`](Self::hidden) suppresses all visual contribution and
/// hit testing of the node and its entire subtree. Properties can still be
/// mutated while hidden; unhiding restores state immediately.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodeFlags {
    /// Whether the node (and its subtree) is hidden.
    pub hidden: bool,
    /// Exclude the node and its subtree from hit testing entirely.
    pub dont_hit_all: bool,
    /// Exclude the text extent from hit testing.
    pub dont_hit_text: bool,
    /// Hit test only the node bounds, never the text extent.
    pub hit_only_bounds: bool,
    /// Suppress `FocusGained` delivery when the hit ray lands on this node.
    pub no_focus_gained: bool,
    /// Keep the node out of the surface plan without hiding its subtree.
    pub dont_render: bool,
}

/// Struct-of-arrays storage for all nodes.
///
/// Nodes are addressed by [`NodeHandle`] handles. Internally, each node
/// occupies a slot in parallel arrays. Destroyed nodes are recycled via a
/// free list, and generation counters turn stale handle access into
/// [`UiError::StaleHandle`] instead of corruption.
pub struct NodeStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Local properties (set by callers) --
    pub(crate) local_pose: Vec<Pose>,
    pub(crate) local_scale: Vec<Vector3<f32>>,
    pub(crate) color: Vec<Vector4<f32>>,
    pub(crate) text: Vec<String>,
    pub(crate) bounds: Vec<Bounds>,
    pub(crate) text_bounds: Vec<Bounds>,
    pub(crate) surface: Vec<Option<SurfaceId>>,
    pub(crate) flags: Vec<NodeFlags>,
    pub(crate) components: Vec<Vec<Box<dyn Component>>>,

    // -- Computed properties (written by evaluate) --
    pub(crate) world_pose: Vec<Pose>,
    pub(crate) world_color: Vec<Vector4<f32>>,
    pub(crate) effective_hidden: Vec<bool>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Traversal cache --
    pub(crate) traversal_order: Vec<u32>,
    pub(crate) traversal_dirty: bool,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl fmt::Debug for NodeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeStore")
            .field("len", &self.len)
            .field("free", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

const WHITE: Vector4<f32> = Vector4 {
    x: 1.0,
    y: 1.0,
    z: 1.0,
    w: 1.0,
};

const UNIT_SCALE: Vector3<f32> = Vector3 {
    x: 1.0,
    y: 1.0,
    z: 1.0,
};

impl NodeStore {
    /// Creates an empty node store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            local_pose: Vec::new(),
            local_scale: Vec::new(),
            color: Vec::new(),
            text: Vec::new(),
            bounds: Vec::new(),
            text_bounds: Vec::new(),
            surface: Vec::new(),
            flags: Vec::new(),
            components: Vec::new(),
            world_pose: Vec::new(),
            world_color: Vec::new(),
            effective_hidden: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            traversal_order: Vec::new(),
            traversal_dirty: true,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a new node and returns its handle.
    ///
    /// The node starts with an identity pose, unit scale, white color, empty
    /// text, zero bounds, no surface, default flags, and no parent.
    pub fn create_node(&mut self) -> NodeHandle {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot. Generation was already bumped on destroy.
            self.parent[idx as usize] = INVALID;
            self.first_child[idx as usize] = INVALID;
            self.next_sibling[idx as usize] = INVALID;
            self.prev_sibling[idx as usize] = INVALID;
            self.local_pose[idx as usize] = Pose::IDENTITY;
            self.local_scale[idx as usize] = UNIT_SCALE;
            self.color[idx as usize] = WHITE;
            self.text[idx as usize].clear();
            self.bounds[idx as usize] = Bounds::ZERO;
            self.text_bounds[idx as usize] = Bounds::ZERO;
            self.surface[idx as usize] = None;
            self.flags[idx as usize] = NodeFlags::default();
            self.components[idx as usize].clear();
            self.world_pose[idx as usize] = Pose::IDENTITY;
            self.world_color[idx as usize] = WHITE;
            self.effective_hidden[idx as usize] = false;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.local_pose.push(Pose::IDENTITY);
            self.local_scale.push(UNIT_SCALE);
            self.color.push(WHITE);
            self.text.push(String::new());
            self.bounds.push(Bounds::ZERO);
            self.text_bounds.push(Bounds::ZERO);
            self.surface.push(None);
            self.flags.push(NodeFlags::default());
            self.components.push(Vec::new());
            self.world_pose.push(Pose::IDENTITY);
            self.world_color.push(WHITE);
            self.effective_hidden.push(false);
            self.generation.push(0);
            idx
        };

        self.traversal_dirty = true;
        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
        self.dirty.mark(idx, dirty::POSE);
        self.dirty.mark(idx, dirty::COLOR);

        NodeHandle {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a node and its entire subtree, freeing the slots for reuse.
    ///
    /// All handles into the subtree become stale immediately; later resolves
    /// observe [`UiError::StaleHandle`]. Safe to call mid-animation.
    pub fn destroy_node(&mut self, handle: NodeHandle) -> Result<(), UiError> {
        let root = self.resolve(handle)?;

        if self.parent[root as usize] != INVALID {
            self.unlink_from_parent(root);
        }

        // Collect the subtree before mutating slots.
        let mut stack = vec![root];
        let mut subtree = Vec::new();
        while let Some(idx) = stack.pop() {
            subtree.push(idx);
            let mut child = self.first_child[idx as usize];
            while child != INVALID {
                stack.push(child);
                child = self.next_sibling[child as usize];
            }
        }

        for &idx in &subtree {
            self.dirty.remove_key(idx);
            // Bump generation so old handles immediately fail resolution.
            self.generation[idx as usize] += 1;
            self.parent[idx as usize] = INVALID;
            self.first_child[idx as usize] = INVALID;
            self.next_sibling[idx as usize] = INVALID;
            self.prev_sibling[idx as usize] = INVALID;
            self.components[idx as usize].clear();
            self.free_list.push(idx);
            self.pending_removed.push(idx);
            self.dirty.mark(idx, dirty::TOPOLOGY);
        }

        self.traversal_dirty = true;
        Ok(())
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, handle: NodeHandle) -> bool {
        (handle.idx < self.len)
            && self.generation[handle.idx as usize] == handle.generation
            && !self.free_list.contains(&handle.idx)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn live_count(&self) -> u32 {
        self.len - self.free_list.len() as u32
    }

    // -- Topology API --

    /// Adds `child` as the last child of `parent`.
    ///
    /// If `child` already has a parent it is detached first. Fails with
    /// [`UiError::WouldCycle`] when `parent` is `child` or one of its
    /// descendants, leaving the tree untouched. Marks inherited channels for
    /// `child`'s subtree so world pose and inherited alpha are recomputed
    /// under the new ancestry.
    pub fn add_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<(), UiError> {
        let p = self.resolve(parent)?;
        let c = self.resolve(child)?;

        // Walk up from the intended parent: finding `child` there means the
        // attach would close a parent loop.
        let mut ancestor = p;
        while ancestor != INVALID {
            if ancestor == c {
                return Err(UiError::WouldCycle { parent, child });
            }
            ancestor = self.parent[ancestor as usize];
        }

        if self.parent[c as usize] != INVALID {
            let old_p = self.parent[c as usize];
            self.unlink_from_parent(c);
            self.dirty.remove_dependency(c, old_p, dirty::POSE);
            self.dirty.remove_dependency(c, old_p, dirty::COLOR);
            self.dirty.mark(old_p, dirty::TOPOLOGY);
        }

        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        // Dirty dependency edges: child depends on parent for POSE and COLOR.
        let _ = self.dirty.add_dependency(c, p, dirty::POSE);
        let _ = self.dirty.add_dependency(c, p, dirty::COLOR);

        self.mark_subtree_inherited_dirty(c);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
        Ok(())
    }

    /// Removes `child` from its current parent, making it a root.
    ///
    /// A node with no parent is left unchanged. Marks inherited channels for
    /// `child`'s subtree so world pose and alpha are recomputed after
    /// detaching from the old ancestry.
    pub fn remove_from_parent(&mut self, child: NodeHandle) -> Result<(), UiError> {
        let c = self.resolve(child)?;
        if self.parent[c as usize] == INVALID {
            return Ok(());
        }

        let p = self.parent[c as usize];
        self.unlink_from_parent(c);

        self.dirty.remove_dependency(c, p, dirty::POSE);
        self.dirty.remove_dependency(c, p, dirty::COLOR);

        self.mark_subtree_inherited_dirty(c);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
        Ok(())
    }

    /// Returns the parent of a node, if any.
    pub fn parent(&self, handle: NodeHandle) -> Result<Option<NodeHandle>, UiError> {
        let idx = self.resolve(handle)?;
        let p = self.parent[idx as usize];
        if p == INVALID {
            Ok(None)
        } else {
            Ok(Some(NodeHandle {
                idx: p,
                generation: self.generation[p as usize],
            }))
        }
    }

    /// Returns an iterator over the direct children of a node.
    pub fn children(&self, handle: NodeHandle) -> Result<Children<'_>, UiError> {
        let idx = self.resolve(handle)?;
        Ok(Children::new(self, self.first_child[idx as usize]))
    }

    /// Returns the handles of root nodes (those with no parent).
    #[must_use]
    pub fn roots(&self) -> Vec<NodeHandle> {
        let mut roots = Vec::new();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                roots.push(NodeHandle {
                    idx,
                    generation: self.generation[idx as usize],
                });
            }
        }
        roots
    }

    // -- Property getters (read-only, no dirty marking) --

    /// Returns the local pose of a node.
    pub fn local_pose(&self, handle: NodeHandle) -> Result<Pose, UiError> {
        let idx = self.resolve(handle)?;
        Ok(self.local_pose[idx as usize])
    }

    /// Returns the local scale of a node.
    pub fn local_scale(&self, handle: NodeHandle) -> Result<Vector3<f32>, UiError> {
        let idx = self.resolve(handle)?;
        Ok(self.local_scale[idx as usize])
    }

    /// Returns the color of a node.
    pub fn color(&self, handle: NodeHandle) -> Result<Vector4<f32>, UiError> {
        let idx = self.resolve(handle)?;
        Ok(self.color[idx as usize])
    }

    /// Returns the display text of a node.
    pub fn text(&self, handle: NodeHandle) -> Result<&str, UiError> {
        let idx = self.resolve(handle)?;
        Ok(&self.text[idx as usize])
    }

    /// Returns the local-space bounds of a node.
    pub fn bounds(&self, handle: NodeHandle) -> Result<Bounds, UiError> {
        let idx = self.resolve(handle)?;
        Ok(self.bounds[idx as usize])
    }

    /// Returns the local-space text extent of a node.
    pub fn text_bounds(&self, handle: NodeHandle) -> Result<Bounds, UiError> {
        let idx = self.resolve(handle)?;
        Ok(self.text_bounds[idx as usize])
    }

    /// Returns the surface reference of a node.
    pub fn surface(&self, handle: NodeHandle) -> Result<Option<SurfaceId>, UiError> {
        let idx = self.resolve(handle)?;
        Ok(self.surface[idx as usize])
    }

    /// Returns the flags of a node.
    pub fn flags(&self, handle: NodeHandle) -> Result<NodeFlags, UiError> {
        let idx = self.resolve(handle)?;
        Ok(self.flags[idx as usize])
    }

    /// Computes the world pose of a node by composing the parent chain.
    ///
    /// Always reflects the latest local poses, independent of
    /// [`evaluate`](Self::evaluate). Idempotent between mutations.
    pub fn world_pose(&self, handle: NodeHandle) -> Result<Pose, UiError> {
        let mut idx = self.resolve(handle)?;
        let mut pose = self.local_pose[idx as usize];
        while self.parent[idx as usize] != INVALID {
            idx = self.parent[idx as usize];
            pose = self.local_pose[idx as usize] * pose;
        }
        Ok(pose)
    }

    /// Computes the world scale of a node (component-wise ancestor product).
    pub fn world_scale(&self, handle: NodeHandle) -> Result<Vector3<f32>, UiError> {
        let mut idx = self.resolve(handle)?;
        let mut scale = self.local_scale[idx as usize];
        while self.parent[idx as usize] != INVALID {
            idx = self.parent[idx as usize];
            let s = self.local_scale[idx as usize];
            scale = Vector3::new(scale.x * s.x, scale.y * s.y, scale.z * s.z);
        }
        Ok(scale)
    }

    /// Returns the computed world color of a node (alpha multiplied through
    /// ancestors).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    pub fn world_color(&self, handle: NodeHandle) -> Result<Vector4<f32>, UiError> {
        let idx = self.resolve(handle)?;
        Ok(self.world_color[idx as usize])
    }

    /// Returns whether the node is effectively hidden (including by an
    /// ancestor's hidden flag).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    pub fn effective_hidden(&self, handle: NodeHandle) -> Result<bool, UiError> {
        let idx = self.resolve(handle)?;
        Ok(self.effective_hidden[idx as usize])
    }

    // -- Mutation API (auto-marks dirty) --

    /// Sets the local pose of a node.
    ///
    /// Marks the POSE channel dirty with eager propagation to descendants.
    pub fn set_local_pose(&mut self, handle: NodeHandle, pose: Pose) -> Result<(), UiError> {
        let idx = self.resolve(handle)?;
        self.local_pose[idx as usize] = pose;
        self.dirty.mark_with(idx, dirty::POSE, &EagerPolicy);
        Ok(())
    }

    /// Sets the local scale of a node.
    pub fn set_local_scale(
        &mut self,
        handle: NodeHandle,
        scale: Vector3<f32>,
    ) -> Result<(), UiError> {
        let idx = self.resolve(handle)?;
        self.local_scale[idx as usize] = scale;
        self.dirty.mark_with(idx, dirty::POSE, &EagerPolicy);
        Ok(())
    }

    /// Sets the color of a node.
    ///
    /// Marks the COLOR channel dirty with eager propagation so descendant
    /// world alpha is recomputed.
    pub fn set_color(&mut self, handle: NodeHandle, color: Vector4<f32>) -> Result<(), UiError> {
        let idx = self.resolve(handle)?;
        self.color[idx as usize] = color;
        self.dirty.mark_with(idx, dirty::COLOR, &EagerPolicy);
        Ok(())
    }

    /// Sets the display text of a node.
    pub fn set_text(&mut self, handle: NodeHandle, text: impl Into<String>) -> Result<(), UiError> {
        let idx = self.resolve(handle)?;
        self.text[idx as usize] = text.into();
        self.dirty.mark(idx, dirty::CONTENT);
        Ok(())
    }

    /// Sets the local-space bounds of a node.
    pub fn set_bounds(&mut self, handle: NodeHandle, bounds: Bounds) -> Result<(), UiError> {
        let idx = self.resolve(handle)?;
        self.bounds[idx as usize] = bounds;
        self.dirty.mark(idx, dirty::CONTENT);
        Ok(())
    }

    /// Sets the local-space text extent of a node.
    pub fn set_text_bounds(&mut self, handle: NodeHandle, bounds: Bounds) -> Result<(), UiError> {
        let idx = self.resolve(handle)?;
        self.text_bounds[idx as usize] = bounds;
        self.dirty.mark(idx, dirty::CONTENT);
        Ok(())
    }

    /// Sets the surface reference of a node.
    pub fn set_surface(
        &mut self,
        handle: NodeHandle,
        surface: Option<SurfaceId>,
    ) -> Result<(), UiError> {
        let idx = self.resolve(handle)?;
        self.surface[idx as usize] = surface;
        self.dirty.mark(idx, dirty::CONTENT);
        Ok(())
    }

    /// Sets the flags of a node.
    ///
    /// Flags can affect both visibility and hit testing; routed through the
    /// POSE channel so effective hidden state is recomputed for the subtree.
    pub fn set_flags(&mut self, handle: NodeHandle, flags: NodeFlags) -> Result<(), UiError> {
        let idx = self.resolve(handle)?;
        self.flags[idx as usize] = flags;
        self.dirty.mark_with(idx, dirty::POSE, &EagerPolicy);
        Ok(())
    }

    // -- Component API --

    /// Attaches a component to a node.
    ///
    /// Attachment order is preserved and is the event delivery order. Fails
    /// with [`UiError::DuplicateComponent`] if a component with the same type
    /// name is already attached; the node is unchanged in that case.
    pub fn attach_component(
        &mut self,
        handle: NodeHandle,
        component: Box<dyn Component>,
    ) -> Result<(), UiError> {
        let idx = self.resolve(handle)?;
        let type_name = component.type_name();
        if self.components[idx as usize]
            .iter()
            .any(|c| c.type_name() == type_name)
        {
            return Err(UiError::DuplicateComponent {
                node: handle,
                type_name,
            });
        }
        self.components[idx as usize].push(component);
        Ok(())
    }

    /// Detaches the component with the given type name.
    ///
    /// Returns whether a component was removed.
    pub fn remove_component(
        &mut self,
        handle: NodeHandle,
        type_name: &str,
    ) -> Result<bool, UiError> {
        let idx = self.resolve(handle)?;
        let comps = &mut self.components[idx as usize];
        let before = comps.len();
        comps.retain(|c| c.type_name() != type_name);
        Ok(comps.len() != before)
    }

    /// Looks up an attached component by concrete type.
    pub fn component<T: Component>(&self, handle: NodeHandle) -> Result<Option<&T>, UiError> {
        let idx = self.resolve(handle)?;
        Ok(self.components[idx as usize]
            .iter()
            .find_map(|c| c.as_any().downcast_ref::<T>()))
    }

    /// Looks up an attached component by concrete type, mutably.
    pub fn component_mut<T: Component>(
        &mut self,
        handle: NodeHandle,
    ) -> Result<Option<&mut T>, UiError> {
        let idx = self.resolve(handle)?;
        Ok(self.components[idx as usize]
            .iter_mut()
            .find_map(|c| c.as_any_mut().downcast_mut::<T>()))
    }

    /// Number of components attached to a node.
    pub fn component_count(&self, handle: NodeHandle) -> Result<usize, UiError> {
        let idx = self.resolve(handle)?;
        Ok(self.components[idx as usize].len())
    }

    /// Takes a node's component list for dispatch.
    ///
    /// The router removes the list while delivering so handlers can mutate
    /// the store freely, then puts it back via
    /// [`put_components`](Self::put_components).
    pub(crate) fn take_components(&mut self, idx: u32) -> Vec<Box<dyn Component>> {
        core::mem::take(&mut self.components[idx as usize])
    }

    /// Restores a component list taken by [`take_components`](Self::take_components).
    ///
    /// Components attached during dispatch land after the restored list so
    /// the original attachment order is preserved.
    pub(crate) fn put_components(&mut self, idx: u32, mut comps: Vec<Box<dyn Component>>) {
        let attached_during_dispatch = core::mem::take(&mut self.components[idx as usize]);
        comps.extend(attached_during_dispatch);
        self.components[idx as usize] = comps;
    }

    // -- Raw-index accessors for renderers --
    //
    // These accept raw slot indices (as found in `FrameChanges` or
    // `traversal_order()`) rather than `NodeHandle`s, skipping generation
    // validation.

    /// Returns the computed world pose at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn world_pose_at(&self, idx: u32) -> Pose {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.world_pose[idx as usize]
    }

    /// Returns the computed world color at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn world_color_at(&self, idx: u32) -> Vector4<f32> {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.world_color[idx as usize]
    }

    /// Returns whether the node at raw slot `idx` is effectively hidden.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn effective_hidden_at(&self, idx: u32) -> bool {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.effective_hidden[idx as usize]
    }

    /// Returns the surface reference at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn surface_at(&self, idx: u32) -> Option<SurfaceId> {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.surface[idx as usize]
    }

    /// Returns the flags at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn flags_at(&self, idx: u32) -> NodeFlags {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.flags[idx as usize]
    }

    /// Returns the handle for a raw slot index under the current generation.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn handle_at(&self, idx: u32) -> NodeHandle {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        NodeHandle {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    // -- Internal helpers --

    /// Resolves a handle to its slot index, failing on stale access.
    pub(crate) fn resolve(&self, handle: NodeHandle) -> Result<u32, UiError> {
        if handle.idx < self.len && self.generation[handle.idx as usize] == handle.generation {
            Ok(handle.idx)
        } else {
            Err(UiError::StaleHandle(handle))
        }
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }

    /// Marks the subtree rooted at `idx` dirty for inherited channels.
    fn mark_subtree_inherited_dirty(&mut self, idx: u32) {
        self.dirty.mark_with(idx, dirty::POSE, &EagerPolicy);
        self.dirty.mark_with(idx, dirty::COLOR, &EagerPolicy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::tests::CountingComponent;
    use cgmath::{Quaternion, Vector3};

    #[test]
    fn create_and_destroy() {
        let mut store = NodeStore::new();
        let id = store.create_node();
        assert!(store.is_alive(id));
        store.destroy_node(id).unwrap();
        assert!(!store.is_alive(id));
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut store = NodeStore::new();
        let id1 = store.create_node();
        store.destroy_node(id1).unwrap();
        let id2 = store.create_node();
        // id2 reuses the same slot but has a different generation.
        assert!(!store.is_alive(id1));
        assert!(store.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
        assert_eq!(store.local_pose(id1), Err(UiError::StaleHandle(id1)));
        assert!(store.local_pose(id2).is_ok());
    }

    #[test]
    fn stale_handle_errors_instead_of_corrupting() {
        let mut store = NodeStore::new();
        let id = store.create_node();
        store.destroy_node(id).unwrap();
        assert!(matches!(
            store.set_color(id, Vector4::new(1.0, 0.0, 0.0, 1.0)),
            Err(UiError::StaleHandle(_))
        ));
        assert!(matches!(store.parent(id), Err(UiError::StaleHandle(_))));
        let root = store.create_node();
        assert!(matches!(
            store.add_child(root, id),
            Err(UiError::StaleHandle(_))
        ));
    }

    #[test]
    fn add_child_and_query() {
        let mut store = NodeStore::new();
        let parent = store.create_node();
        let child1 = store.create_node();
        let child2 = store.create_node();

        store.add_child(parent, child1).unwrap();
        store.add_child(parent, child2).unwrap();

        assert_eq!(store.parent(child1).unwrap(), Some(parent));
        assert_eq!(store.parent(child2).unwrap(), Some(parent));

        let kids: Vec<_> = store.children(parent).unwrap().collect();
        assert_eq!(kids, vec![child1, child2]);
    }

    #[test]
    fn add_child_detaches_from_old_parent() {
        let mut store = NodeStore::new();
        let p1 = store.create_node();
        let p2 = store.create_node();
        let child = store.create_node();

        store.add_child(p1, child).unwrap();
        store.add_child(p2, child).unwrap();

        assert_eq!(store.parent(child).unwrap(), Some(p2));
        assert!(store.children(p1).unwrap().next().is_none());
    }

    #[test]
    fn remove_from_parent_works() {
        let mut store = NodeStore::new();
        let parent = store.create_node();
        let child = store.create_node();

        store.add_child(parent, child).unwrap();
        store.remove_from_parent(child).unwrap();
        assert_eq!(store.parent(child).unwrap(), None);
        assert!(store.children(parent).unwrap().next().is_none());

        // Removing a root is a no-op.
        store.remove_from_parent(child).unwrap();
    }

    #[test]
    fn sibling_links_agree_after_middle_removal() {
        let mut store = NodeStore::new();
        let parent = store.create_node();
        let a = store.create_node();
        let b = store.create_node();
        let c = store.create_node();
        store.add_child(parent, a).unwrap();
        store.add_child(parent, b).unwrap();
        store.add_child(parent, c).unwrap();

        store.remove_from_parent(b).unwrap();

        let kids: Vec<_> = store.children(parent).unwrap().collect();
        assert_eq!(kids, vec![a, c]);
        assert_eq!(store.prev_sibling[c.idx as usize], a.idx);
        assert_eq!(store.next_sibling[a.idx as usize], c.idx);
    }

    #[test]
    fn add_child_rejects_parent_cycles() {
        let mut store = NodeStore::new();
        let root = store.create_node();
        let mid = store.create_node();
        let leaf = store.create_node();
        store.add_child(root, mid).unwrap();
        store.add_child(mid, leaf).unwrap();

        assert!(matches!(
            store.add_child(leaf, root),
            Err(UiError::WouldCycle { .. })
        ));
        assert!(matches!(
            store.add_child(mid, mid),
            Err(UiError::WouldCycle { .. })
        ));

        // The tree is untouched: root is still parentless and world-pose
        // composition still terminates.
        assert_eq!(store.parent(root).unwrap(), None);
        assert_eq!(store.parent(leaf).unwrap(), Some(mid));
        let _ = store.world_pose(leaf).unwrap();
    }

    #[test]
    fn destroy_frees_whole_subtree() {
        let mut store = NodeStore::new();
        let root = store.create_node();
        let child = store.create_node();
        let grandchild = store.create_node();
        store.add_child(root, child).unwrap();
        store.add_child(child, grandchild).unwrap();

        store.destroy_node(root).unwrap();

        assert!(!store.is_alive(root));
        assert!(!store.is_alive(child));
        assert!(!store.is_alive(grandchild));
        assert_eq!(store.live_count(), 0);
        assert!(matches!(
            store.local_pose(grandchild),
            Err(UiError::StaleHandle(_))
        ));
    }

    #[test]
    fn destroy_mid_tree_keeps_the_rest_consistent() {
        let mut store = NodeStore::new();
        let root = store.create_node();
        let a = store.create_node();
        let b = store.create_node();
        store.add_child(root, a).unwrap();
        store.add_child(root, b).unwrap();

        store.destroy_node(a).unwrap();

        let kids: Vec<_> = store.children(root).unwrap().collect();
        assert_eq!(kids, vec![b]);
        assert!(store.is_alive(root));
        assert!(store.is_alive(b));
    }

    #[test]
    fn roots_returns_parentless_nodes() {
        let mut store = NodeStore::new();
        let a = store.create_node();
        let b = store.create_node();
        let c = store.create_node();
        store.add_child(a, c).unwrap();

        let roots = store.roots();
        assert!(roots.contains(&a));
        assert!(roots.contains(&b));
        assert!(!roots.contains(&c));
    }

    #[test]
    fn world_pose_composes_parent_chain() {
        let mut store = NodeStore::new();
        let parent = store.create_node();
        let child = store.create_node();
        store.add_child(parent, child).unwrap();

        store
            .set_local_pose(parent, Pose::from_translation(Vector3::new(1.0, 0.0, 0.0)))
            .unwrap();
        store
            .set_local_pose(child, Pose::from_translation(Vector3::new(0.0, 2.0, 0.0)))
            .unwrap();

        let world = store.world_pose(child).unwrap();
        assert_eq!(world.position, Vector3::new(1.0, 2.0, 0.0));
        // Idempotent between mutations.
        assert_eq!(store.world_pose(child).unwrap(), world);
    }

    #[test]
    fn world_scale_multiplies_componentwise() {
        let mut store = NodeStore::new();
        let parent = store.create_node();
        let child = store.create_node();
        store.add_child(parent, child).unwrap();
        store
            .set_local_scale(parent, Vector3::new(2.0, 2.0, 2.0))
            .unwrap();
        store
            .set_local_scale(child, Vector3::new(0.5, 3.0, 1.0))
            .unwrap();
        assert_eq!(
            store.world_scale(child).unwrap(),
            Vector3::new(1.0, 6.0, 2.0)
        );
    }

    #[test]
    fn attach_component_rejects_duplicates() {
        let mut store = NodeStore::new();
        let id = store.create_node();
        store
            .attach_component(id, Box::new(CountingComponent::default()))
            .unwrap();
        let err = store
            .attach_component(id, Box::new(CountingComponent::default()))
            .unwrap_err();
        assert!(matches!(err, UiError::DuplicateComponent { .. }));
        // The first attachment is still there, and only that one.
        assert_eq!(store.component_count(id).unwrap(), 1);
    }

    #[test]
    fn component_downcast_lookup() {
        let mut store = NodeStore::new();
        let id = store.create_node();
        store
            .attach_component(id, Box::new(CountingComponent::default()))
            .unwrap();
        assert!(store.component::<CountingComponent>(id).unwrap().is_some());
        store
            .component_mut::<CountingComponent>(id)
            .unwrap()
            .unwrap()
            .seen += 1;
        assert_eq!(
            store.component::<CountingComponent>(id).unwrap().unwrap().seen,
            1
        );
    }

    #[test]
    fn remove_component_by_type_name() {
        let mut store = NodeStore::new();
        let id = store.create_node();
        store
            .attach_component(id, Box::new(CountingComponent::default()))
            .unwrap();
        assert!(store.remove_component(id, "CountingComponent").unwrap());
        assert!(!store.remove_component(id, "CountingComponent").unwrap());
        assert_eq!(store.component_count(id).unwrap(), 0);
    }

    #[test]
    fn slot_reuse_resets_properties() {
        let mut store = NodeStore::new();
        let id = store.create_node();
        store.set_text(id, "old").unwrap();
        store
            .set_color(id, Vector4::new(0.0, 0.0, 0.0, 0.0))
            .unwrap();
        store.destroy_node(id).unwrap();

        let id2 = store.create_node();
        assert_eq!(store.text(id2).unwrap(), "");
        assert_eq!(store.color(id2).unwrap(), Vector4::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(store.local_pose(id2).unwrap(), Pose::IDENTITY);
    }

    #[test]
    fn tree_has_no_parent_child_disagreement() {
        let mut store = NodeStore::new();
        let root = store.create_node();
        let mut prev = root;
        for _ in 0..4 {
            let n = store.create_node();
            store.add_child(prev, n).unwrap();
            prev = n;
        }
        // Every child's parent back-reference agrees with the child list.
        for idx in 0..store.len {
            let h = store.handle_at(idx);
            for kid in store.children(h).unwrap() {
                assert_eq!(store.parent(kid).unwrap(), Some(h));
            }
        }
    }

    #[test]
    fn set_local_pose_accepts_rotation() {
        let mut store = NodeStore::new();
        let id = store.create_node();
        let pose = Pose::new(
            Vector3::new(0.0, 1.0, -2.0),
            Quaternion::new(1.0, 0.0, 0.0, 0.0),
        );
        store.set_local_pose(id, pose).unwrap();
        assert_eq!(store.local_pose(id).unwrap(), pose);
    }
}
