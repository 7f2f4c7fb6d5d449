// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per
//! event to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use marquee_core::trace::{
    ComponentErrorEvent, DispatchErrorEvent, EventDispatchedEvent, HitEvent, StateChangeEvent,
    TickEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_tick(&mut self, e: &TickEvent) {
        let _ = writeln!(
            self.writer,
            "[tick] index={} dt={:.1}ms drained={}",
            e.tick_index,
            f64::from(e.dt) * 1000.0,
            e.drained_events,
        );
    }

    fn on_event_dispatched(&mut self, e: &EventDispatchedEvent) {
        let handled = if e.handled { "consumed" } else { "alive" };
        let _ = writeln!(
            self.writer,
            "[event] {:?} via {:?} target={:?} {handled}",
            e.event_type, e.dispatch, e.target,
        );
    }

    fn on_hit(&mut self, e: &HitEvent) {
        let _ = writeln!(
            self.writer,
            "[hit] device={} node={:?} dist={:.3}",
            e.device.0, e.node, e.distance,
        );
    }

    fn on_state_change(&mut self, e: &StateChangeEvent) {
        let _ = writeln!(self.writer, "[state] {:?} -> {:?}", e.from, e.to);
    }

    fn on_component_error(&mut self, e: &ComponentErrorEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[error] node={:?} component={} event={:?}",
            e.node, e.component, e.event_type,
        );
    }

    fn on_dispatch_error(&mut self, e: &DispatchErrorEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[error] dropped {:?} target={:?}: {}",
            e.event_type, e.target, e.error,
        );
    }
}
