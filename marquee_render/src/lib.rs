// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface-plan definitions for marquee menu rendering.
//!
//! This crate provides the intermediate representation between
//! [`marquee_core`]'s node tree evaluation and renderer-specific drawing.
//! It defines:
//!
//! - [`SurfaceItem`] — a single draw-ready surface descriptor
//! - [`SurfacePlan`] — the ordered list of descriptors for one frame,
//!   rebuilt lazily when evaluation reports changes
//!
//! It never touches a graphics API; renderers translate the plan into
//! their own draw calls.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod plan;

pub use plan::{SurfaceItem, SurfacePlan};
