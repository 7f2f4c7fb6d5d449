// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The node store uses multi-channel dirty tracking (via [`understory_dirty`])
//! to propagate invalidation through the node tree. Each channel represents an
//! independent category of change.
//!
//! # Propagation semantics
//!
//! - **Propagating** — [`POSE`] and [`COLOR`] use
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and have dependency edges
//!   from child to parent. Marking a parent dirty automatically marks all
//!   descendants, because world poses and inherited alpha flow down the tree.
//!   (Flag changes are routed through [`POSE`] so the same drain pass
//!   recomputes world poses and effective visibility together.)
//!
//! - **Local-only** — [`CONTENT`] is marked with the default policy. Only the
//!   explicitly marked node appears in the drain output, since text, bounds,
//!   and surface references are per-node properties.
//!
//! - **Structural** — [`TOPOLOGY`] is marked on topology mutations
//!   (add/remove child, create/destroy node). It triggers a traversal-order
//!   rebuild during evaluation but does not propagate to descendants.
//!
//! Callers never query dirty state directly: each
//! [`NodeStore::evaluate`](crate::node::NodeStore::evaluate) call drains all
//! channels and surfaces the results as
//! [`FrameChanges`](crate::node::FrameChanges).

use understory_dirty::Channel;

/// Local pose, scale, or flags changed — requires world pose and effective
/// visibility recomputation for descendants.
pub const POSE: Channel = Channel::new(0);

/// Color changed — requires inherited alpha recomputation for descendants.
pub const COLOR: Channel = Channel::new(1);

/// Text, bounds, or surface reference changed — no propagation needed.
pub const CONTENT: Channel = Channel::new(2);

/// Tree topology changed — triggers traversal order rebuild.
pub const TOPOLOGY: Channel = Channel::new(3);
