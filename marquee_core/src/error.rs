// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy for the menu object system.
//!
//! Every failure here is recoverable at the call site. The router and the
//! menu state machine never let one of these abort a frame: a failing
//! component is logged and treated as not-handled, and a stale handle means
//! the caller should drop its reference.

use core::fmt;

use crate::event::{DispatchMode, EventType};
use crate::node::NodeHandle;

/// Errors produced by node, component, and dispatch operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiError {
    /// A handle was resolved after its node was destroyed (or the slot was
    /// reused under a newer generation). Drop the reference.
    StaleHandle(NodeHandle),
    /// A component with the same type name is already attached to the node.
    /// No state was changed.
    DuplicateComponent {
        /// The node the attach was aimed at.
        node: NodeHandle,
        /// The conflicting component type name.
        type_name: &'static str,
    },
    /// An attach would make a node an ancestor of itself. No state was
    /// changed; the tree stays acyclic.
    WouldCycle {
        /// The intended parent (a descendant of `child`, or `child` itself).
        parent: NodeHandle,
        /// The node being attached.
        child: NodeHandle,
    },
    /// A reflection lookup was made for a type that was never registered.
    UnknownType(String),
    /// An event was dispatched with a mode its type does not allow (for
    /// example a broadcast-only lifecycle event sent `Direct`). Programmer
    /// error: fatal in debug builds, logged and ignored in release.
    MalformedEvent {
        /// The offending event type.
        event_type: EventType,
        /// The mode it was dispatched with.
        dispatch: DispatchMode,
    },
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleHandle(h) => write!(f, "stale node handle: {h:?}"),
            Self::DuplicateComponent { node, type_name } => {
                write!(f, "component {type_name:?} already attached to {node:?}")
            }
            Self::WouldCycle { parent, child } => {
                write!(f, "attaching {child:?} under {parent:?} would cycle the tree")
            }
            Self::UnknownType(name) => write!(f, "unregistered reflection type {name:?}"),
            Self::MalformedEvent {
                event_type,
                dispatch,
            } => write!(f, "event {event_type:?} cannot be dispatched as {dispatch:?}"),
        }
    }
}

impl std::error::Error for UiError {}
