// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The component capability: per-node behavior driven by events.
//!
//! Components are attached to nodes in the store and receive events from the
//! router in attachment order. A handler gets an [`EventCtx`] with mutable
//! access to the store; it must never dispatch synchronously from inside
//! `on_event` — follow-up events go through the queue and are delivered at
//! the start of the next tick.

use core::any::Any;

use crate::error::UiError;
use crate::event::{Event, EventFlags, EventQueue, EventStatus};
use crate::node::{NodeHandle, NodeStore};

/// Host-provided sound effect playback (asset boundary).
pub trait SoundPlayer {
    /// Plays the named sound effect.
    fn play(&mut self, name: &str);
}

/// A [`SoundPlayer`] that discards everything. The default for tests and
/// headless use.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSoundPlayer;

impl SoundPlayer for NullSoundPlayer {
    fn play(&mut self, _name: &str) {}
}

/// Context passed to component handlers during event delivery.
///
/// The handled node's own component list is detached while its handlers run,
/// so the store can be mutated freely (including attaching components to the
/// node itself; those are delivered from the next event on).
pub struct EventCtx<'a> {
    /// The node store the event's menu lives in.
    pub store: &'a mut NodeStore,
    /// Queue for deferred follow-up events.
    pub queue: &'a mut EventQueue,
    /// Sound effect playback.
    pub sounds: &'a mut dyn SoundPlayer,
    /// Seconds since the previous tick.
    pub dt: f32,
    /// Seconds since an arbitrary epoch, monotonic across ticks.
    pub now: f64,
}

impl core::fmt::Debug for EventCtx<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventCtx")
            .field("dt", &self.dt)
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

/// Behavior attached to a node.
///
/// `event_flags` is re-read before every delivery, so a component can stop
/// receiving an event type by removing it from its flags (the built-ins do
/// this with [`Init`](crate::event::EventType::Init) after first delivery).
pub trait Component: Any {
    /// A stable name identifying the concrete type. At most one component
    /// per type name can be attached to a node.
    fn type_name(&self) -> &'static str;

    /// The event types this component wants delivered.
    fn event_flags(&self) -> EventFlags;

    /// Handles an event aimed at (or passing through) the owning node.
    ///
    /// Returning [`EventStatus::Consumed`] stops further delivery of
    /// consumable events. Errors are logged by the router and treated as
    /// [`EventStatus::Alive`]; they never abort the frame.
    fn on_event(
        &mut self,
        ctx: &mut EventCtx<'_>,
        self_handle: NodeHandle,
        event: &Event,
    ) -> Result<EventStatus, UiError>;

    /// Downcast support.
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
