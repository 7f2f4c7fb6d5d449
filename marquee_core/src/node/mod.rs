// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node tree data model.
//!
//! A *node* is one object in a retained menu: a panel, a label, a button, or
//! a pure grouping container. Each node has:
//!
//! - An identity ([`NodeHandle`]) — a generational handle that becomes stale
//!   when the node is destroyed, turning use-after-free into
//!   [`UiError::StaleHandle`](crate::error::UiError::StaleHandle).
//! - Topology — parent, first-child, and sibling links forming an ordered tree.
//! - **Local properties** set by the caller: [`pose`](NodeStore::set_local_pose),
//!   [`scale`](NodeStore::set_local_scale), [`color`](NodeStore::set_color),
//!   [`text`](NodeStore::set_text), [`bounds`](NodeStore::set_bounds),
//!   [`surface`](NodeStore::set_surface), and [`flags`](NodeStore::set_flags).
//! - **Computed properties** produced by [`evaluate`](NodeStore::evaluate):
//!   `world_pose` (composition of ancestor local poses) and `world_color`
//!   (alpha multiplied through ancestors).
//! - **Components** — behavior attached per node, delivered events by the
//!   router in attachment order.
//!
//! Nodes are stored in struct-of-arrays layout with index-based handles for
//! cache-friendly traversal.
//!
//! # Dirty tracking
//!
//! Property mutations automatically mark the corresponding dirty channel
//! (see [`dirty`](crate::dirty)):
//!
//! - **POSE** / **COLOR** — propagate to all descendants, since world poses
//!   and inherited alpha flow down the tree.
//! - **CONTENT** — local-only; only the modified node is marked.
//! - **TOPOLOGY** — structural changes (add/remove child, create/destroy
//!   node) that trigger a traversal-order rebuild.

mod evaluate;
mod id;
mod store;
mod traverse;

pub use evaluate::FrameChanges;
pub use id::{DeviceId, INVALID, NodeHandle, SurfaceId};
pub use store::{NodeFlags, NodeStore};
pub use traverse::Children;
