// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event routing over the node tree.
//!
//! The router owns the focus path and delivers events according to their
//! [`DispatchMode`]:
//!
//! - **Direct** — to the target node's components in attachment order; the
//!   first `Consumed` stops delivery of consumable events.
//! - **FocusPath** — root-to-leaf over the current focus path, the per-node
//!   rule as Direct; an ancestor consuming a consumable event stops descent.
//! - **Broadcast** — the whole subtree in deterministic pre-order;
//!   consumption never stops delivery (notifications only).
//!
//! A component handler that fails is reported through the trace sink and
//! treated as not-handled; the frame never aborts. Handlers cannot re-enter
//! the router: follow-up events go through the queue.

use crate::component::{EventCtx, SoundPlayer};
use crate::error::UiError;
use crate::event::{DispatchMode, Event, EventQueue, EventStatus};
use crate::node::{NodeHandle, NodeStore};
use crate::trace::{ComponentErrorEvent, EventDispatchedEvent, Tracer};

/// Shared mutable state a dispatch runs against.
///
/// Bundles the store with the tick's clock and collaborators so dispatch
/// call sites stay readable.
pub struct DispatchArgs<'a> {
    /// The node store.
    pub store: &'a mut NodeStore,
    /// Queue for deferred follow-up events.
    pub queue: &'a mut EventQueue,
    /// Sound effect playback.
    pub sounds: &'a mut dyn SoundPlayer,
    /// Seconds since the previous tick.
    pub dt: f32,
    /// Seconds since an arbitrary epoch.
    pub now: f64,
}

impl core::fmt::Debug for DispatchArgs<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DispatchArgs")
            .field("dt", &self.dt)
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

/// Routes events through a menu's subtree. Owned per menu.
#[derive(Debug, Default)]
pub struct Router {
    focus_path: Vec<NodeHandle>,
}

impl Router {
    /// Creates a router with an empty focus path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current root-to-leaf focus path; empty when nothing is focused.
    #[must_use]
    pub fn focus_path(&self) -> &[NodeHandle] {
        &self.focus_path
    }

    /// Recomputes the focus path as the root-to-leaf chain ending at
    /// `handle`, or clears it for `None`.
    pub fn set_focus(
        &mut self,
        store: &NodeStore,
        handle: Option<NodeHandle>,
    ) -> Result<(), UiError> {
        match handle {
            Some(h) => self.focus_path = store.path_from_root(h)?,
            None => self.focus_path.clear(),
        }
        Ok(())
    }

    /// Delivers `event` and returns whether any component consumed it.
    ///
    /// Fails with [`UiError::MalformedEvent`] when the event's type/mode
    /// pairing is invalid, and with [`UiError::StaleHandle`] when a `Direct`
    /// target is gone. Nodes that go stale mid-walk (destroyed by an earlier
    /// handler) are skipped silently.
    pub fn dispatch(
        &mut self,
        args: &mut DispatchArgs<'_>,
        tracer: &mut Tracer<'_>,
        event: &Event,
    ) -> Result<bool, UiError> {
        if !event.mode_is_valid() {
            debug_assert!(
                false,
                "event {:?} cannot be dispatched as {:?}",
                event.event_type, event.dispatch
            );
            return Err(UiError::MalformedEvent {
                event_type: event.event_type,
                dispatch: event.dispatch,
            });
        }

        let stop_on_consume = event.event_type.is_consumable();
        let handled = match event.dispatch {
            DispatchMode::Direct => {
                // A stale direct target is the caller's error.
                let _ = args.store.resolve(event.target)?;
                deliver_to_node(args, tracer, event.target, event, stop_on_consume)
            }
            DispatchMode::FocusPath => {
                let path = self.focus_path.clone();
                let mut consumed = false;
                for node in path {
                    if deliver_to_node(args, tracer, node, event, stop_on_consume) {
                        consumed = true;
                        if stop_on_consume {
                            break;
                        }
                    }
                }
                consumed
            }
            DispatchMode::Broadcast => {
                let subtree = match args.store.collect_subtree(event.target) {
                    Ok(nodes) => nodes,
                    // A stale broadcast root delivers to nothing.
                    Err(UiError::StaleHandle(_)) => Vec::new(),
                    Err(e) => return Err(e),
                };
                let mut consumed = false;
                for node in subtree {
                    // Consumption never stops a broadcast.
                    if deliver_to_node(args, tracer, node, event, false) {
                        consumed = true;
                    }
                }
                consumed
            }
        };

        tracer.event_dispatched(&EventDispatchedEvent {
            event_type: event.event_type,
            dispatch: event.dispatch,
            target: event.target,
            handled,
        });
        Ok(handled)
    }
}

/// Delivers `event` to one node's components in attachment order.
///
/// The component list is detached from the slot while handlers run so they
/// can mutate the store freely. Returns whether any component consumed.
fn deliver_to_node(
    args: &mut DispatchArgs<'_>,
    tracer: &mut Tracer<'_>,
    handle: NodeHandle,
    event: &Event,
    stop_on_consume: bool,
) -> bool {
    let Ok(idx) = args.store.resolve(handle) else {
        // Destroyed by an earlier handler this dispatch; skip.
        return false;
    };

    let mut comps = args.store.take_components(idx);
    let mut consumed = false;
    for component in &mut comps {
        if !component.event_flags().contains(event.event_type) {
            continue;
        }
        let mut ctx = EventCtx {
            store: args.store,
            queue: args.queue,
            sounds: args.sounds,
            dt: args.dt,
            now: args.now,
        };
        match component.on_event(&mut ctx, handle, event) {
            Ok(EventStatus::Consumed) => {
                consumed = true;
                if stop_on_consume {
                    break;
                }
            }
            Ok(EventStatus::Alive) => {}
            Err(_err) => {
                // Failed handlers count as not-handled; keep going.
                tracer.component_error(&ComponentErrorEvent {
                    node: handle,
                    component: component.type_name(),
                    event_type: event.event_type,
                });
            }
        }
    }

    // A handler may have destroyed its own node; only restore into a live slot.
    if args.store.is_alive(handle) {
        args.store.put_components(idx, comps);
    }
    consumed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, NullSoundPlayer};
    use crate::component::tests::CountingComponent;
    use crate::event::{EventFlags, EventType};

    /// Always fails; used to prove errors do not stop delivery.
    #[derive(Debug, Default)]
    struct FailingComponent;

    impl Component for FailingComponent {
        fn type_name(&self) -> &'static str {
            "FailingComponent"
        }

        fn event_flags(&self) -> EventFlags {
            EventFlags::ALL
        }

        fn on_event(
            &mut self,
            _ctx: &mut EventCtx<'_>,
            self_handle: NodeHandle,
            _event: &Event,
        ) -> Result<EventStatus, UiError> {
            Err(UiError::StaleHandle(self_handle))
        }

        fn as_any(&self) -> &dyn core::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn core::any::Any {
            self
        }
    }

    fn dispatch_one(
        router: &mut Router,
        store: &mut NodeStore,
        event: &Event,
    ) -> Result<bool, UiError> {
        let mut queue = EventQueue::new();
        let mut sounds = NullSoundPlayer;
        let mut args = DispatchArgs {
            store,
            queue: &mut queue,
            sounds: &mut sounds,
            dt: 0.016,
            now: 0.0,
        };
        router.dispatch(&mut args, &mut Tracer::none(), event)
    }

    fn counting(consume: bool) -> Box<CountingComponent> {
        Box::new(CountingComponent {
            consume,
            ..CountingComponent::default()
        })
    }

    fn seen(store: &NodeStore, h: NodeHandle) -> usize {
        store.component::<CountingComponent>(h).unwrap().unwrap().seen
    }

    #[test]
    fn direct_delivers_to_target_only() {
        let mut store = NodeStore::new();
        let root = store.create_node();
        let child = store.create_node();
        store.add_child(root, child).unwrap();
        store.attach_component(root, counting(false)).unwrap();
        store.attach_component(child, counting(false)).unwrap();

        let mut router = Router::new();
        let handled = dispatch_one(
            &mut router,
            &mut store,
            &Event::direct(EventType::Selected, child),
        )
        .unwrap();

        assert!(!handled);
        assert_eq!(seen(&store, root), 0);
        assert_eq!(seen(&store, child), 1);
    }

    #[test]
    fn direct_to_stale_target_errors() {
        let mut store = NodeStore::new();
        let node = store.create_node();
        store.destroy_node(node).unwrap();

        let mut router = Router::new();
        let result = dispatch_one(
            &mut router,
            &mut store,
            &Event::direct(EventType::Selected, node),
        );
        assert!(matches!(result, Err(UiError::StaleHandle(_))));
    }

    #[test]
    fn broadcast_reaches_subtree_in_preorder_despite_consumption() {
        let mut store = NodeStore::new();
        let root = store.create_node();
        let a = store.create_node();
        let b = store.create_node();
        store.add_child(root, a).unwrap();
        store.add_child(root, b).unwrap();
        // Root consumes, but a broadcast keeps going.
        store.attach_component(root, counting(true)).unwrap();
        store.attach_component(a, counting(false)).unwrap();
        store.attach_component(b, counting(false)).unwrap();

        let mut router = Router::new();
        let handled = dispatch_one(
            &mut router,
            &mut store,
            &Event::broadcast(EventType::Opening, root),
        )
        .unwrap();

        assert!(handled);
        assert_eq!(seen(&store, root), 1);
        assert_eq!(seen(&store, a), 1);
        assert_eq!(seen(&store, b), 1);
    }

    #[test]
    fn focus_path_stops_at_consuming_ancestor() {
        let mut store = NodeStore::new();
        let root = store.create_node();
        let mid = store.create_node();
        let leaf = store.create_node();
        store.add_child(root, mid).unwrap();
        store.add_child(mid, leaf).unwrap();
        store.attach_component(root, counting(false)).unwrap();
        store.attach_component(mid, counting(true)).unwrap();
        store.attach_component(leaf, counting(false)).unwrap();

        let mut router = Router::new();
        router.set_focus(&store, Some(leaf)).unwrap();
        assert_eq!(router.focus_path(), &[root, mid, leaf]);

        let handled = dispatch_one(
            &mut router,
            &mut store,
            &Event::focus_path(EventType::Selected),
        )
        .unwrap();

        assert!(handled);
        assert_eq!(seen(&store, root), 1);
        assert_eq!(seen(&store, mid), 1);
        assert_eq!(seen(&store, leaf), 0, "descent stopped at mid");
    }

    #[test]
    fn first_consumer_wins_within_a_node() {
        let mut store = NodeStore::new();
        let node = store.create_node();

        // Two counters of distinct type names are needed; wrap one.
        #[derive(Debug, Default)]
        struct SecondCounter(CountingComponent);
        impl Component for SecondCounter {
            fn type_name(&self) -> &'static str {
                "SecondCounter"
            }
            fn event_flags(&self) -> EventFlags {
                EventFlags::ALL
            }
            fn on_event(
                &mut self,
                ctx: &mut EventCtx<'_>,
                self_handle: NodeHandle,
                event: &Event,
            ) -> Result<EventStatus, UiError> {
                self.0.on_event(ctx, self_handle, event)
            }
            fn as_any(&self) -> &dyn core::any::Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn core::any::Any {
                self
            }
        }

        store.attach_component(node, counting(true)).unwrap();
        store
            .attach_component(node, Box::new(SecondCounter::default()))
            .unwrap();

        let mut router = Router::new();
        dispatch_one(
            &mut router,
            &mut store,
            &Event::direct(EventType::Selected, node),
        )
        .unwrap();
        assert_eq!(seen(&store, node), 1);
        assert_eq!(
            store.component::<SecondCounter>(node).unwrap().unwrap().0.seen,
            0,
            "consumable event stops at the first consumer"
        );

        // A non-consumable broadcast reaches both.
        dispatch_one(
            &mut router,
            &mut store,
            &Event::broadcast(EventType::FrameUpdate, node),
        )
        .unwrap();
        assert_eq!(seen(&store, node), 2);
        assert_eq!(
            store.component::<SecondCounter>(node).unwrap().unwrap().0.seen,
            1
        );
    }

    #[test]
    fn failing_component_does_not_stop_delivery() {
        let mut store = NodeStore::new();
        let node = store.create_node();
        store
            .attach_component(node, Box::new(FailingComponent))
            .unwrap();
        store.attach_component(node, counting(false)).unwrap();

        let mut router = Router::new();
        let handled = dispatch_one(
            &mut router,
            &mut store,
            &Event::direct(EventType::Selected, node),
        )
        .unwrap();

        assert!(!handled, "errors count as not-handled");
        assert_eq!(seen(&store, node), 1, "later components still delivered");
    }

    #[test]
    fn malformed_mode_is_rejected() {
        let mut store = NodeStore::new();
        let node = store.create_node();
        let mut router = Router::new();

        let bad = Event::direct(EventType::Opened, node);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            dispatch_one(&mut router, &mut store, &bad)
        }));
        // Debug builds assert; release builds surface the error.
        match result {
            Ok(r) => assert!(matches!(r, Err(UiError::MalformedEvent { .. }))),
            Err(_) => {}
        }
    }

    #[test]
    fn broadcast_to_stale_root_is_quietly_empty() {
        let mut store = NodeStore::new();
        let node = store.create_node();
        store.destroy_node(node).unwrap();

        let mut router = Router::new();
        let handled = dispatch_one(
            &mut router,
            &mut store,
            &Event::broadcast(EventType::Closed, node),
        )
        .unwrap();
        assert!(!handled);
    }
}
