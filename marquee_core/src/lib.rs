// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types and node tree for retained-mode VR menus.
//!
//! `marquee_core` provides the foundational data structures for building
//! menus out of 3D panels: a struct-of-arrays node tree with generational
//! handles, typed components attached to nodes, and the event routing, ray
//! hit testing, and open/close animation that drive them.
//!
//! # Architecture
//!
//! The crate is organized around a per-frame tick that turns device input
//! into component events and scene updates:
//!
//! ```text
//!   InputSample (per device)
//!       │
//!       ▼
//!   HitTester::sweep() ──► synthesized events
//!                               │
//!             queued events ────┤
//!                               ▼
//!   Router::dispatch() ──► Component::on_event()
//!                               │
//!                               ▼
//!   NodeStore::evaluate() ──► FrameChanges ──► renderer
//! ```
//!
//! **[`node`]** — Struct-of-arrays node tree with generational handles.
//! Properties (pose, scale, color, text, bounds) are set by the caller;
//! world poses and inherited alpha are computed by evaluation.
//!
//! **[`dirty`]** — Multi-channel dirty tracking via `understory_dirty`.
//! Property mutations automatically mark the appropriate channel. POSE and
//! COLOR propagate to descendants; CONTENT is local-only; TOPOLOGY triggers
//! a traversal rebuild.
//!
//! **[`component`]** — The [`Component`](component::Component) trait:
//! per-node behaviors that subscribe to event types and react to delivery.
//! [`components`] holds the stock implementations (focus highlighting,
//! fade in/out, button actions).
//!
//! **[`event`]** — Event types, payloads, and the
//! [`EventQueue`](event::EventQueue) for handler-deferred follow-ups.
//!
//! **[`router`]** — Delivers events directly, down the focus path, or as a
//! pre-order broadcast, honoring per-component subscriptions and
//! consumption.
//!
//! **[`hit`]** — Per-device ray sweeps over the tree plus focus, touch, and
//! swipe event synthesis.
//!
//! **[`menu`]** — The [`Menu`](menu::Menu) open/close state machine and the
//! tick pipeline tying the above together.
//!
//! **[`fader`]** / **[`easing`]** — Alpha interpolation for menu
//! transitions and component highlights.
//!
//! **[`math`]** — [`Pose`](math::Pose), [`Bounds`](math::Bounds), and
//! [`Ray`](math::Ray) on top of `cgmath`.
//!
//! **[`reflect`]** — Runtime field layouts and component factories for
//! debug tooling.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types
//! for tick-loop instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod component;
pub mod components;
pub mod dirty;
pub mod easing;
pub mod error;
pub mod event;
pub mod fader;
pub mod hit;
pub mod math;
pub mod menu;
pub mod node;
pub mod reflect;
pub mod router;
pub mod trace;
