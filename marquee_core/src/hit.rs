// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ray hit testing and per-device input event synthesis.
//!
//! Each tick the menu hands the tester one [`InputSample`] per device. The
//! tester sweeps the menu subtree with the device ray, diffs the result
//! against the device's previous state, and synthesizes focus, touch, and
//! swipe events for the router to deliver. The sweep order is the
//! deterministic pre-order traversal, so identical trees and rays always
//! produce identical events.

use std::collections::BTreeMap;

use cgmath::Vector3;

use crate::error::UiError;
use crate::event::{Event, EventPayload, EventType};
use crate::math::{Bounds, Ray};
use crate::node::{DeviceId, NodeHandle, NodeStore};

/// One device's input for one tick.
#[derive(Clone, Copy, Debug)]
pub struct InputSample {
    /// The device this sample came from.
    pub device: DeviceId,
    /// The device's pointing ray in world space (direction normalized).
    pub ray: Ray,
    /// Trigger value in `[0, 1]`; values at or above 0.5 count as held.
    pub trigger: f32,
}

/// The result of a hit sweep: the nearest hit-testable node under the ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitResult {
    /// The node the ray landed on.
    pub handle: NodeHandle,
    /// Ray-entry distance in world units.
    pub distance: f32,
    /// The hit point in the node's local space.
    pub local: Vector3<f32>,
}

/// Finds the nearest hit under `ray` in the subtree rooted at `root`.
///
/// The sweep walks the subtree in pre-order. A node with `hidden` or
/// `dont_hit_all` set prunes itself and its whole subtree. Each remaining
/// node is tested in its own pose-local space against its bounds, and
/// against its text extent unless `hit_only_bounds` or `dont_hit_text`
/// excludes it. The strictly smallest entry distance wins; on an exact tie
/// the node earlier in traversal order keeps the hit.
pub fn compute_hit(
    store: &NodeStore,
    root: NodeHandle,
    ray: &Ray,
) -> Result<Option<HitResult>, UiError> {
    let mut best: Option<HitResult> = None;
    hit_walk(store, root, ray, &mut best)?;
    Ok(best)
}

fn hit_walk(
    store: &NodeStore,
    handle: NodeHandle,
    ray: &Ray,
    best: &mut Option<HitResult>,
) -> Result<(), UiError> {
    let flags = store.flags(handle)?;
    if flags.hidden || flags.dont_hit_all {
        return Ok(());
    }

    let world = store.world_pose(handle)?;
    let scale = store.world_scale(handle)?;
    let local_ray = ray.transformed_by(&world.inverse());

    let mut test = |bounds: Bounds, best: &mut Option<HitResult>| {
        if bounds.is_empty() {
            return;
        }
        let scaled = Bounds::new(
            Vector3::new(
                bounds.min.x * scale.x,
                bounds.min.y * scale.y,
                bounds.min.z * scale.z,
            ),
            Vector3::new(
                bounds.max.x * scale.x,
                bounds.max.y * scale.y,
                bounds.max.z * scale.z,
            ),
        );
        if let Some(t) = scaled.intersect_ray(&local_ray) {
            // Strict comparison: ties keep the earlier node.
            if best.is_none_or(|b| t < b.distance) {
                *best = Some(HitResult {
                    handle,
                    distance: t,
                    local: local_ray.at(t),
                });
            }
        }
    };

    test(store.bounds(handle)?, best);
    if !flags.hit_only_bounds && !flags.dont_hit_text {
        test(store.text_bounds(handle)?, best);
    }

    for child in store.children(handle)? {
        hit_walk(store, child, ray, best)?;
    }
    Ok(())
}

/// Per-device focus and touch state carried across ticks.
#[derive(Clone, Copy, Debug, Default)]
struct DeviceState {
    focused: Option<NodeHandle>,
    trigger_down: bool,
    /// The node focused when the trigger went down; touch events stick to it.
    touch_node: Option<NodeHandle>,
    /// Local hit point at trigger-down, for swipe recognition.
    touch_anchor: Vector3<f32>,
    /// Local hit point last tick while held.
    last_touch: Vector3<f32>,
}

/// Sweeps device rays over a menu subtree and synthesizes input events.
///
/// Owned per menu. Devices are tracked by [`DeviceId`]; a device that stops
/// reporting simply stops producing events (its focus is dropped on the next
/// sample it does send).
#[derive(Debug, Default)]
pub struct HitTester {
    devices: BTreeMap<DeviceId, DeviceState>,
    hits: Vec<(DeviceId, HitResult)>,
}

impl HitTester {
    /// Creates a tester with no device state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The hits produced by the most recent [`sweep`](Self::sweep).
    #[must_use]
    pub fn last_hits(&self) -> &[(DeviceId, HitResult)] {
        &self.hits
    }

    /// The node a device currently focuses, if any.
    #[must_use]
    pub fn focused(&self, device: DeviceId) -> Option<NodeHandle> {
        self.devices.get(&device).and_then(|s| s.focused)
    }

    /// Drops all per-device state (used when the menu closes).
    pub fn reset(&mut self) {
        self.devices.clear();
        self.hits.clear();
    }

    /// Processes one tick of input and returns the synthesized events in
    /// delivery order.
    ///
    /// Per device: focus diff first (`FocusLost` to the old node, then
    /// `FocusGained` to the new one unless its `no_focus_gained` flag is
    /// set), then trigger edges (`TouchDown` / `TouchUp` with swipe
    /// recognition), then held-trigger motion (`TouchRelative` and
    /// `TouchAbsolute`).
    pub fn sweep(
        &mut self,
        store: &NodeStore,
        root: NodeHandle,
        inputs: &[InputSample],
        swipe_threshold: f32,
    ) -> Result<Vec<Event>, UiError> {
        let mut events = Vec::new();
        self.hits.clear();

        for input in inputs {
            let hit = compute_hit(store, root, &input.ray)?;
            if let Some(h) = hit {
                self.hits.push((input.device, h));
            }
            let state = self.devices.entry(input.device).or_default();

            // Focus diff.
            let new_focus = hit.map(|h| h.handle);
            if new_focus != state.focused {
                if let Some(prev) = state.focused
                    && store.is_alive(prev)
                {
                    events.push(Event::direct(EventType::FocusLost, prev));
                }
                if let Some(next) = new_focus
                    && !store.flags(next)?.no_focus_gained
                {
                    let mut gained = Event::direct(EventType::FocusGained, next);
                    if let Some(h) = hit {
                        gained = gained.with_hit(h);
                    }
                    events.push(gained);
                }
                state.focused = new_focus;
            }

            // Trigger edges and held motion.
            let held = input.trigger >= 0.5;
            match (state.trigger_down, held) {
                (false, true) => {
                    if let (Some(node), Some(h)) = (state.focused, hit) {
                        state.touch_node = Some(node);
                        state.touch_anchor = h.local;
                        state.last_touch = h.local;
                        events.push(
                            Event::direct(EventType::TouchDown, node)
                                .with_hit(h)
                                .with_payload(EventPayload::Vector(h.local)),
                        );
                    }
                    state.trigger_down = true;
                }
                (true, false) => {
                    if let Some(node) = state.touch_node.filter(|n| store.is_alive(*n)) {
                        events.push(
                            Event::direct(EventType::TouchUp, node)
                                .with_payload(EventPayload::Vector(state.last_touch)),
                        );
                        let delta = state.last_touch - state.touch_anchor;
                        if let Some(swipe) = recognize_swipe(delta, swipe_threshold) {
                            events.push(
                                Event::direct(swipe, node)
                                    .with_payload(EventPayload::Vector(delta)),
                            );
                            events.push(Event::direct(EventType::SwipeComplete, node));
                        }
                    }
                    state.touch_node = None;
                    state.trigger_down = false;
                }
                (true, true) => {
                    if let (Some(node), Some(h)) = (state.touch_node, hit)
                        && store.is_alive(node)
                    {
                        let delta = h.local - state.last_touch;
                        events.push(
                            Event::direct(EventType::TouchRelative, node)
                                .with_payload(EventPayload::Vector(delta)),
                        );
                        events.push(
                            Event::direct(EventType::TouchAbsolute, node)
                                .with_payload(EventPayload::Vector(h.local)),
                        );
                        state.last_touch = h.local;
                    }
                }
                (false, false) => {}
            }
        }
        Ok(events)
    }
}

/// Maps a local-space drag displacement to a swipe, if the dominant axis
/// moved beyond the threshold.
fn recognize_swipe(delta: Vector3<f32>, threshold: f32) -> Option<EventType> {
    if delta.x.abs() >= delta.y.abs() {
        if delta.x.abs() < threshold {
            return None;
        }
        Some(if delta.x > 0.0 {
            EventType::SwipeForward
        } else {
            EventType::SwipeBack
        })
    } else {
        if delta.y.abs() < threshold {
            return None;
        }
        Some(if delta.y > 0.0 {
            EventType::SwipeUp
        } else {
            EventType::SwipeDown
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Pose;
    use crate::node::NodeFlags;

    fn panel(store: &mut NodeStore, root: NodeHandle, z: f32) -> NodeHandle {
        let node = store.create_node();
        store.add_child(root, node).unwrap();
        store
            .set_local_pose(node, Pose::from_translation(Vector3::new(0.0, 0.0, z)))
            .unwrap();
        store
            .set_bounds(node, Bounds::from_half_extents(0.5, 0.5, 0.1))
            .unwrap();
        node
    }

    fn forward_ray() -> Ray {
        Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0))
    }

    fn sample(trigger: f32) -> InputSample {
        InputSample {
            device: DeviceId(0),
            ray: forward_ray(),
            trigger,
        }
    }

    #[test]
    fn nearest_panel_wins() {
        let mut store = NodeStore::new();
        let root = store.create_node();
        let far = panel(&mut store, root, -5.0);
        let near = panel(&mut store, root, -2.0);

        let hit = compute_hit(&store, root, &forward_ray()).unwrap().unwrap();
        assert_eq!(hit.handle, near);
        assert_ne!(hit.handle, far);
        assert!((hit.distance - 1.9).abs() < 1e-5, "t = {}", hit.distance);
    }

    #[test]
    fn exact_tie_keeps_earlier_traversal_node() {
        let mut store = NodeStore::new();
        let root = store.create_node();
        let first = panel(&mut store, root, -3.0);
        let _second = panel(&mut store, root, -3.0);

        let hit = compute_hit(&store, root, &forward_ray()).unwrap().unwrap();
        assert_eq!(hit.handle, first);
    }

    #[test]
    fn dont_hit_all_prunes_subtree() {
        let mut store = NodeStore::new();
        let root = store.create_node();
        let shield = panel(&mut store, root, -2.0);
        let inner = panel(&mut store, shield, 0.0);
        store
            .set_flags(
                shield,
                NodeFlags {
                    dont_hit_all: true,
                    ..NodeFlags::default()
                },
            )
            .unwrap();

        let hit = compute_hit(&store, root, &forward_ray()).unwrap();
        assert!(hit.is_none(), "{inner:?} should be pruned with its parent");
    }

    #[test]
    fn hidden_node_is_not_hit() {
        let mut store = NodeStore::new();
        let root = store.create_node();
        let p = panel(&mut store, root, -2.0);
        store
            .set_flags(
                p,
                NodeFlags {
                    hidden: true,
                    ..NodeFlags::default()
                },
            )
            .unwrap();
        assert!(compute_hit(&store, root, &forward_ray()).unwrap().is_none());
    }

    #[test]
    fn text_extent_is_skipped_when_flagged() {
        let mut store = NodeStore::new();
        let root = store.create_node();
        let node = store.create_node();
        store.add_child(root, node).unwrap();
        store
            .set_local_pose(node, Pose::from_translation(Vector3::new(0.0, 0.0, -2.0)))
            .unwrap();
        // Only the text extent is under the ray.
        store
            .set_text_bounds(node, Bounds::from_half_extents(0.5, 0.5, 0.1))
            .unwrap();
        store
            .set_bounds(
                node,
                Bounds::from_center_half_extents(
                    Vector3::new(5.0, 0.0, 0.0),
                    Vector3::new(0.1, 0.1, 0.1),
                ),
            )
            .unwrap();

        assert!(compute_hit(&store, root, &forward_ray()).unwrap().is_some());

        store
            .set_flags(
                node,
                NodeFlags {
                    dont_hit_text: true,
                    ..NodeFlags::default()
                },
            )
            .unwrap();
        assert!(compute_hit(&store, root, &forward_ray()).unwrap().is_none());
    }

    #[test]
    fn focus_diff_emits_lost_then_gained() {
        let mut store = NodeStore::new();
        let root = store.create_node();
        let a = panel(&mut store, root, -2.0);
        let mut tester = HitTester::new();

        let events = tester.sweep(&store, root, &[sample(0.0)], 0.1).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::FocusGained);
        assert_eq!(events[0].target, a);

        // Same hit again: no focus churn.
        let events = tester.sweep(&store, root, &[sample(0.0)], 0.1).unwrap();
        assert!(events.is_empty());

        // Ray now misses everything.
        let miss = InputSample {
            device: DeviceId(0),
            ray: Ray::new(Vector3::new(50.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0)),
            trigger: 0.0,
        };
        let events = tester.sweep(&store, root, &[miss], 0.1).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::FocusLost);
        assert_eq!(events[0].target, a);
    }

    #[test]
    fn no_focus_gained_flag_suppresses_gain_but_not_loss() {
        let mut store = NodeStore::new();
        let root = store.create_node();
        let a = panel(&mut store, root, -2.0);
        store
            .set_flags(
                a,
                NodeFlags {
                    no_focus_gained: true,
                    ..NodeFlags::default()
                },
            )
            .unwrap();
        let mut tester = HitTester::new();

        let events = tester.sweep(&store, root, &[sample(0.0)], 0.1).unwrap();
        assert!(events.is_empty(), "FocusGained suppressed");
        assert_eq!(tester.focused(DeviceId(0)), Some(a));
    }

    #[test]
    fn trigger_edges_produce_touch_down_and_up() {
        let mut store = NodeStore::new();
        let root = store.create_node();
        let a = panel(&mut store, root, -2.0);
        let mut tester = HitTester::new();

        let _ = tester.sweep(&store, root, &[sample(0.0)], 0.1).unwrap();
        let events = tester.sweep(&store, root, &[sample(1.0)], 0.1).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::TouchDown);
        assert_eq!(events[0].target, a);

        let events = tester.sweep(&store, root, &[sample(0.0)], 0.1).unwrap();
        assert_eq!(events.len(), 1, "no swipe below threshold");
        assert_eq!(events[0].event_type, EventType::TouchUp);
        assert_eq!(events[0].target, a);
    }

    #[test]
    fn held_trigger_produces_relative_and_absolute() {
        let mut store = NodeStore::new();
        let root = store.create_node();
        let _a = panel(&mut store, root, -2.0);
        let mut tester = HitTester::new();

        let _ = tester.sweep(&store, root, &[sample(1.0)], 0.1).unwrap();

        // Drag sideways while held.
        let dragged = InputSample {
            device: DeviceId(0),
            ray: Ray::new(Vector3::new(0.2, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0)),
            trigger: 1.0,
        };
        let events = tester.sweep(&store, root, &[dragged], 0.1).unwrap();
        let types: Vec<_> = events.iter().map(|e| e.event_type).collect();
        assert!(types.contains(&EventType::TouchRelative), "{types:?}");
        assert!(types.contains(&EventType::TouchAbsolute), "{types:?}");
    }

    #[test]
    fn release_after_long_drag_recognizes_swipe() {
        let mut store = NodeStore::new();
        let root = store.create_node();
        let a = panel(&mut store, root, -2.0);
        let mut tester = HitTester::new();

        let _ = tester.sweep(&store, root, &[sample(1.0)], 0.1).unwrap();
        let dragged = InputSample {
            device: DeviceId(0),
            ray: Ray::new(Vector3::new(0.4, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0)),
            trigger: 1.0,
        };
        let _ = tester.sweep(&store, root, &[dragged], 0.1).unwrap();
        let released = InputSample {
            device: DeviceId(0),
            ray: Ray::new(Vector3::new(0.4, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0)),
            trigger: 0.0,
        };
        let events = tester.sweep(&store, root, &[released], 0.1).unwrap();
        let types: Vec<_> = events.iter().map(|e| e.event_type).collect();
        assert_eq!(
            types,
            vec![
                EventType::TouchUp,
                EventType::SwipeForward,
                EventType::SwipeComplete
            ]
        );
        assert!(events.iter().all(|e| e.target == a));
    }

    #[test]
    fn swipe_axis_mapping() {
        assert_eq!(
            recognize_swipe(Vector3::new(0.3, 0.0, 0.0), 0.1),
            Some(EventType::SwipeForward)
        );
        assert_eq!(
            recognize_swipe(Vector3::new(-0.3, 0.1, 0.0), 0.1),
            Some(EventType::SwipeBack)
        );
        assert_eq!(
            recognize_swipe(Vector3::new(0.05, 0.3, 0.0), 0.1),
            Some(EventType::SwipeUp)
        );
        assert_eq!(
            recognize_swipe(Vector3::new(0.0, -0.3, 0.0), 0.1),
            Some(EventType::SwipeDown)
        );
        assert_eq!(recognize_swipe(Vector3::new(0.05, 0.05, 0.0), 0.1), None);
    }

    #[test]
    fn devices_are_tracked_independently() {
        let mut store = NodeStore::new();
        let root = store.create_node();
        let a = panel(&mut store, root, -2.0);
        let mut tester = HitTester::new();

        let inputs = [
            InputSample {
                device: DeviceId(0),
                ray: forward_ray(),
                trigger: 0.0,
            },
            InputSample {
                device: DeviceId(1),
                ray: forward_ray(),
                trigger: 0.0,
            },
        ];
        let events = tester.sweep(&store, root, &inputs, 0.1).unwrap();
        // Both devices gain focus on the same node.
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.event_type == EventType::FocusGained));
        assert_eq!(tester.focused(DeviceId(0)), Some(a));
        assert_eq!(tester.focused(DeviceId(1)), Some(a));
    }
}
