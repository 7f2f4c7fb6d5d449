// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and reflection export for marquee diagnostics.
//!
//! This crate provides development-time tooling over
//! [`marquee_core`]'s trace and reflection surfaces:
//!
//! - [`pretty::PrettyPrintSink`] — human-readable one-line-per-event output
//!   implementing [`TraceSink`](marquee_core::trace::TraceSink).
//! - [`dump`] — walks a [`ReflectionRegistry`](marquee_core::reflect::ReflectionRegistry)
//!   and emits its type layouts as JSON.

pub mod dump;
pub mod pretty;
