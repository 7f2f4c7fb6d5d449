// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface plan: an ordered sequence of draw-ready surfaces for one frame.

use cgmath::{Vector3, Vector4};
use kurbo::Rect;

use marquee_core::error::UiError;
use marquee_core::math::Pose;
use marquee_core::node::{FrameChanges, NodeHandle, NodeStore, SurfaceId};

/// A single draw-ready surface descriptor.
///
/// Items are produced in back-to-front order, matching the node tree's
/// traversal order.
#[derive(Clone, Debug)]
pub struct SurfaceItem {
    /// The node this item originates from.
    pub node: NodeHandle,
    /// The surface to draw, if the node references one.
    pub surface: Option<SurfaceId>,
    /// World-space pose.
    pub pose: Pose,
    /// Accumulated world scale.
    pub scale: Vector3<f32>,
    /// World color; alpha is accumulated from ancestors.
    pub color: Vector4<f32>,
    /// The node's text, if any. Renderers lay it out themselves.
    pub text: Option<String>,
    /// The node's bounds projected onto its panel plane (local x/y,
    /// scaled), for quad sizing and text placement.
    pub panel_rect: Rect,
}

/// An ordered list of draw-ready surfaces for a single frame.
///
/// The plan caches its items between frames: feed each evaluation's
/// [`FrameChanges`] to [`note_changes`](Self::note_changes) and the next
/// [`rebuild`](Self::rebuild) walks the tree only if something actually
/// changed.
#[derive(Clone, Debug, Default)]
pub struct SurfacePlan {
    items: Vec<SurfaceItem>,
    stale: bool,
}

impl SurfacePlan {
    /// Creates an empty plan. The first [`rebuild`](Self::rebuild) always
    /// walks the tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            stale: true,
        }
    }

    /// The current items, in back-to-front order.
    #[must_use]
    pub fn items(&self) -> &[SurfaceItem] {
        &self.items
    }

    /// Marks the plan stale if the evaluation reported any change.
    pub fn note_changes(&mut self, changes: &FrameChanges) {
        if !changes.is_empty() {
            self.stale = true;
        }
    }

    /// Rebuilds the item list if stale. Returns whether a rebuild ran.
    ///
    /// Call after [`NodeStore::evaluate`], which refreshes the cached world
    /// poses and colors this reads. Nodes that are effectively hidden, have
    /// `dont_render` set, or carry neither a surface nor text produce no
    /// item; their children are still visited.
    pub fn rebuild(&mut self, store: &NodeStore) -> Result<bool, UiError> {
        if !self.stale {
            return Ok(false);
        }
        self.items.clear();

        for &idx in store.traversal_order() {
            if store.effective_hidden_at(idx) {
                continue;
            }
            let flags = store.flags_at(idx);
            if flags.dont_render {
                continue;
            }
            let surface = store.surface_at(idx);
            let handle = store.handle_at(idx);
            let text = store.text(handle)?;
            if surface.is_none() && text.is_empty() {
                continue;
            }

            let scale = store.world_scale(handle)?;
            let bounds = store.bounds(handle)?;
            self.items.push(SurfaceItem {
                node: handle,
                surface,
                pose: store.world_pose_at(idx),
                scale,
                color: store.world_color_at(idx),
                text: if text.is_empty() {
                    None
                } else {
                    Some(text.to_owned())
                },
                panel_rect: Rect::new(
                    f64::from(bounds.min.x * scale.x),
                    f64::from(bounds.min.y * scale.y),
                    f64::from(bounds.max.x * scale.x),
                    f64::from(bounds.max.y * scale.y),
                ),
            });
        }

        self.stale = false;
        Ok(true)
    }

    /// Clears the plan and forces the next rebuild to run.
    pub fn clear(&mut self) {
        self.items.clear();
        self.stale = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::node::NodeFlags;

    fn surfaced(store: &mut NodeStore, parent: Option<NodeHandle>, surface: u32) -> NodeHandle {
        let node = store.create_node();
        store.set_surface(node, Some(SurfaceId(surface))).unwrap();
        if let Some(p) = parent {
            store.add_child(p, node).unwrap();
        }
        node
    }

    #[test]
    fn items_follow_traversal_order_back_to_front() {
        let mut store = NodeStore::new();
        let root = surfaced(&mut store, None, 0);
        let a = surfaced(&mut store, Some(root), 1);
        let a_child = surfaced(&mut store, Some(a), 2);
        let b = surfaced(&mut store, Some(root), 3);

        let changes = store.evaluate();
        let mut plan = SurfacePlan::new();
        plan.note_changes(&changes);
        assert!(plan.rebuild(&store).unwrap());

        let order: Vec<NodeHandle> = plan.items().iter().map(|i| i.node).collect();
        assert_eq!(order, &[root, a, a_child, b]);
    }

    #[test]
    fn rebuild_skips_when_nothing_changed() {
        let mut store = NodeStore::new();
        let _ = surfaced(&mut store, None, 0);

        let mut plan = SurfacePlan::new();
        plan.note_changes(&store.evaluate());
        assert!(plan.rebuild(&store).unwrap());
        assert_eq!(plan.items().len(), 1);

        // A second evaluate with no mutations reports nothing.
        plan.note_changes(&store.evaluate());
        assert!(!plan.rebuild(&store).unwrap());
        assert_eq!(plan.items().len(), 1);
    }

    #[test]
    fn hidden_and_dont_render_nodes_produce_no_items() {
        let mut store = NodeStore::new();
        let root = surfaced(&mut store, None, 0);
        let hidden = surfaced(&mut store, Some(root), 1);
        let hidden_child = surfaced(&mut store, Some(hidden), 2);
        let skipped = surfaced(&mut store, Some(root), 3);
        store
            .set_flags(
                hidden,
                NodeFlags {
                    hidden: true,
                    ..NodeFlags::default()
                },
            )
            .unwrap();
        store
            .set_flags(
                skipped,
                NodeFlags {
                    dont_render: true,
                    ..NodeFlags::default()
                },
            )
            .unwrap();

        let mut plan = SurfacePlan::new();
        plan.note_changes(&store.evaluate());
        plan.rebuild(&store).unwrap();

        let nodes: Vec<NodeHandle> = plan.items().iter().map(|i| i.node).collect();
        assert_eq!(nodes, &[root]);
        assert!(!nodes.contains(&hidden_child));
    }

    #[test]
    fn grouping_nodes_without_surface_or_text_are_skipped() {
        let mut store = NodeStore::new();
        let group = store.create_node();
        let leaf = surfaced(&mut store, Some(group), 7);
        store.set_text(leaf, "ok").unwrap();

        let mut plan = SurfacePlan::new();
        plan.note_changes(&store.evaluate());
        plan.rebuild(&store).unwrap();

        assert_eq!(plan.items().len(), 1);
        assert_eq!(plan.items()[0].node, leaf);
        assert_eq!(plan.items()[0].text.as_deref(), Some("ok"));
    }

    #[test]
    fn color_change_marks_the_plan_stale() {
        let mut store = NodeStore::new();
        let node = surfaced(&mut store, None, 0);
        let mut plan = SurfacePlan::new();
        plan.note_changes(&store.evaluate());
        plan.rebuild(&store).unwrap();

        store
            .set_color(node, cgmath::Vector4::new(1.0, 0.0, 0.0, 0.5))
            .unwrap();
        plan.note_changes(&store.evaluate());
        assert!(plan.rebuild(&store).unwrap());
        assert!((plan.items()[0].color.w - 0.5).abs() < 1e-6);
    }
}
