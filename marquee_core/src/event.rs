// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event values and the plumbing shared by the router and hit tester.
//!
//! Events are immutable once constructed. Components never dispatch
//! synchronously from inside a handler; follow-up work goes through
//! [`EventQueue`] and is delivered at the start of the next tick.

use cgmath::Vector3;

use crate::hit::HitResult;
use crate::math::Pose;
use crate::node::NodeHandle;

/// Everything that can happen to a menu object.
///
/// The discriminant doubles as the bit index in [`EventFlags`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum EventType {
    /// The hit ray moved onto this node.
    FocusGained,
    /// The hit ray moved off this node.
    FocusLost,
    /// Trigger pressed while the node was focused.
    TouchDown,
    /// Trigger released.
    TouchUp,
    /// Pointer moved while the trigger is held; payload is the delta.
    TouchRelative,
    /// Pointer position while the trigger is held; payload is absolute.
    TouchAbsolute,
    /// Swipe along the pointing direction.
    SwipeForward,
    /// Swipe against the pointing direction.
    SwipeBack,
    /// Upward swipe.
    SwipeUp,
    /// Downward swipe.
    SwipeDown,
    /// Per-tick update, broadcast to the whole menu.
    FrameUpdate,
    /// The menu is about to be submitted for drawing this frame.
    Render,
    /// The menu began its open transition.
    Opening,
    /// The open transition finished.
    Opened,
    /// The menu began its close transition.
    Closing,
    /// The close transition finished.
    Closed,
    /// First-tick initialization, delivered exactly once per component.
    Init,
    /// The node was selected.
    Selected,
    /// The node was deselected.
    Deselected,
    /// A recognized swipe gesture finished.
    SwipeComplete,
    /// An item-level action (e.g. a button press) completed.
    ItemActionComplete,
}

impl EventType {
    /// Lifecycle and per-frame notifications; consumption never stops
    /// their delivery.
    #[must_use]
    pub const fn is_consumable(self) -> bool {
        !matches!(
            self,
            Self::FrameUpdate
                | Self::Render
                | Self::Opening
                | Self::Opened
                | Self::Closing
                | Self::Closed
                | Self::Init
        )
    }

    /// Menu-wide notifications that only make sense as broadcasts.
    #[must_use]
    pub const fn is_broadcast_only(self) -> bool {
        matches!(
            self,
            Self::FrameUpdate
                | Self::Render
                | Self::Opening
                | Self::Opened
                | Self::Closing
                | Self::Closed
                | Self::Init
        )
    }
}

/// A set of [`EventType`]s a component subscribes to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EventFlags(u64);

impl EventFlags {
    /// The empty set.
    pub const NONE: Self = Self(0);

    /// Every event type.
    pub const ALL: Self = Self(u64::MAX);

    /// Builds a set from a list of types.
    #[must_use]
    pub const fn of(types: &[EventType]) -> Self {
        let mut bits = 0_u64;
        let mut i = 0;
        while i < types.len() {
            bits |= 1 << types[i] as u32;
            i += 1;
        }
        Self(bits)
    }

    /// Whether `ty` is in the set.
    #[must_use]
    pub const fn contains(self, ty: EventType) -> bool {
        self.0 & (1 << ty as u32) != 0
    }

    /// Whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Set union.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Removes `ty` from the set.
    #[must_use]
    pub const fn without(self, ty: EventType) -> Self {
        Self(self.0 & !(1 << ty as u32))
    }
}

impl core::ops::BitOr for EventFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// How an event travels through the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DispatchMode {
    /// Deliver to one target node only.
    Direct,
    /// Deliver root-to-leaf along the current focus path.
    FocusPath,
    /// Deliver to an entire subtree in deterministic pre-order.
    Broadcast,
}

/// Optional data riding along with an event.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum EventPayload {
    /// No payload.
    #[default]
    None,
    /// A single scalar, e.g. a trigger value.
    Scalar(f32),
    /// A direction or delta.
    Vector(Vector3<f32>),
    /// A full pose.
    Pose(Pose),
}

/// An immutable event value.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// What happened.
    pub event_type: EventType,
    /// How it travels.
    pub dispatch: DispatchMode,
    /// The node it is aimed at (`Direct`) or the subtree root
    /// (`Broadcast`). Unused for `FocusPath`.
    pub target: NodeHandle,
    /// A secondary node, e.g. the item a menu-level action came from.
    pub other: NodeHandle,
    /// Optional event data.
    pub payload: EventPayload,
    /// The hit that produced this event, for input-derived events.
    pub hit: Option<HitResult>,
}

impl Event {
    /// An event aimed at a single node.
    #[must_use]
    pub fn direct(event_type: EventType, target: NodeHandle) -> Self {
        Self {
            event_type,
            dispatch: DispatchMode::Direct,
            target,
            other: NodeHandle::DANGLING,
            payload: EventPayload::None,
            hit: None,
        }
    }

    /// An event walking the current focus path.
    #[must_use]
    pub fn focus_path(event_type: EventType) -> Self {
        Self {
            event_type,
            dispatch: DispatchMode::FocusPath,
            target: NodeHandle::DANGLING,
            other: NodeHandle::DANGLING,
            payload: EventPayload::None,
            hit: None,
        }
    }

    /// A notification for every node under `root`.
    #[must_use]
    pub fn broadcast(event_type: EventType, root: NodeHandle) -> Self {
        Self {
            event_type,
            dispatch: DispatchMode::Broadcast,
            target: root,
            other: NodeHandle::DANGLING,
            payload: EventPayload::None,
            hit: None,
        }
    }

    /// Attaches a payload.
    #[must_use]
    pub fn with_payload(mut self, payload: EventPayload) -> Self {
        self.payload = payload;
        self
    }

    /// Attaches the hit that produced the event.
    #[must_use]
    pub fn with_hit(mut self, hit: HitResult) -> Self {
        self.hit = Some(hit);
        self
    }

    /// Records a secondary node.
    #[must_use]
    pub fn with_other(mut self, other: NodeHandle) -> Self {
        self.other = other;
        self
    }

    /// Whether the type/mode pairing is deliverable. Broadcast-only types
    /// must go out as broadcasts; anything may be broadcast.
    #[must_use]
    pub fn mode_is_valid(&self) -> bool {
        !self.event_type.is_broadcast_only() || self.dispatch == DispatchMode::Broadcast
    }
}

/// Whether a component handler consumed an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventStatus {
    /// Stop delivery of a consumable event.
    Consumed,
    /// Keep delivering.
    Alive,
}

/// Deferred events pushed by component handlers during dispatch.
///
/// Drained by the menu at the start of the next tick, before the input
/// sweep, so handlers never re-enter the router.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<Event>,
}

impl EventQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defers `event` until the next tick.
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Takes all queued events in push order.
    pub fn drain(&mut self) -> Vec<Event> {
        core::mem::take(&mut self.events)
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
