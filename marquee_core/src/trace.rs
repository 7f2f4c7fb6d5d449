// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the menu tick loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! router, hit tester, and menu state machine call at each stage. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.

use crate::error::UiError;
use crate::event::{DispatchMode, EventType};
use crate::menu::MenuState;
use crate::node::{DeviceId, NodeHandle};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted once per [`Menu::tick`](crate::menu::Menu::tick).
#[derive(Clone, Copy, Debug)]
pub struct TickEvent {
    /// Monotonic tick counter.
    pub tick_index: u64,
    /// Seconds since the previous tick.
    pub dt: f32,
    /// Number of queued events drained at the start of this tick.
    pub drained_events: usize,
}

/// Emitted after an event finishes dispatch.
#[derive(Clone, Copy, Debug)]
pub struct EventDispatchedEvent {
    /// The event type.
    pub event_type: EventType,
    /// How it traveled.
    pub dispatch: DispatchMode,
    /// The node it was aimed at, if any.
    pub target: NodeHandle,
    /// Whether any component consumed it.
    pub handled: bool,
}

/// Emitted when the per-device hit sweep lands on a node.
#[derive(Clone, Copy, Debug)]
pub struct HitEvent {
    /// The device whose ray produced the hit.
    pub device: DeviceId,
    /// The node the ray landed on.
    pub node: NodeHandle,
    /// Ray-entry distance in world units.
    pub distance: f32,
}

/// Emitted when the menu state machine transitions.
#[derive(Clone, Copy, Debug)]
pub struct StateChangeEvent {
    /// State before the transition.
    pub from: MenuState,
    /// State after the transition.
    pub to: MenuState,
}

/// Emitted when a component handler returns an error.
///
/// The router logs the failure and continues; the frame never aborts.
#[derive(Clone, Copy, Debug)]
pub struct ComponentErrorEvent<'a> {
    /// The node the component is attached to.
    pub node: NodeHandle,
    /// The component's type name.
    pub component: &'a str,
    /// The event type being delivered when the error occurred.
    pub event_type: EventType,
}

/// Emitted when a whole dispatch fails before reaching any component, for
/// example a queued event whose target went stale.
///
/// The menu reports the failure and drops the event; the tick continues.
#[derive(Clone, Copy, Debug)]
pub struct DispatchErrorEvent<'a> {
    /// The event type being dispatched.
    pub event_type: EventType,
    /// The node the event was aimed at.
    pub target: NodeHandle,
    /// The failure.
    pub error: &'a UiError,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the menu tick loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called at the start of each menu tick.
    fn on_tick(&mut self, e: &TickEvent) {
        _ = e;
    }

    /// Called after each event finishes dispatch.
    fn on_event_dispatched(&mut self, e: &EventDispatchedEvent) {
        _ = e;
    }

    /// Called when the hit sweep lands on a node.
    fn on_hit(&mut self, e: &HitEvent) {
        _ = e;
    }

    /// Called when the menu state machine transitions.
    fn on_state_change(&mut self, e: &StateChangeEvent) {
        _ = e;
    }

    /// Called when a component handler fails.
    fn on_component_error(&mut self, e: &ComponentErrorEvent<'_>) {
        _ = e;
    }

    /// Called when a dispatch fails as a whole.
    fn on_dispatch_error(&mut self, e: &DispatchErrorEvent<'_>) {
        _ = e;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`TickEvent`].
    #[inline]
    pub fn tick(&mut self, e: &TickEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tick(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`EventDispatchedEvent`].
    #[inline]
    pub fn event_dispatched(&mut self, e: &EventDispatchedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_event_dispatched(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`HitEvent`].
    #[inline]
    pub fn hit(&mut self, e: &HitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_hit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`StateChangeEvent`].
    #[inline]
    pub fn state_change(&mut self, e: &StateChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_state_change(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ComponentErrorEvent`].
    #[inline]
    pub fn component_error(&mut self, e: &ComponentErrorEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_component_error(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DispatchErrorEvent`].
    #[inline]
    pub fn dispatch_error(&mut self, e: &DispatchErrorEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_dispatch_error(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}
