// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label, button, and list-panel builders on top of [`marquee_core`].
//!
//! These are the glue pieces menu code writes over and over: a text node
//! with bounds, a button with focus hilight and a press action, and a
//! fixed-capacity list panel that scrolls its rows as lines are appended.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

use cgmath::{Vector3, Vector4};
use kurbo::{Rect, Size};

use marquee_core::components::{ButtonOnUp, DefaultComponent};
use marquee_core::error::UiError;
use marquee_core::math::{Bounds, Pose};
use marquee_core::node::{NodeHandle, NodeStore, SurfaceId};

/// Parameters for a plain text node.
#[derive(Clone, Debug)]
pub struct LabelParms {
    /// The label text.
    pub text: String,
    /// Local pose relative to the parent.
    pub pose: Pose,
    /// Local scale.
    pub scale: Vector3<f32>,
    /// Local color.
    pub color: Vector4<f32>,
    /// Local-space bounds.
    pub bounds: Bounds,
    /// Background surface, if any.
    pub surface: Option<SurfaceId>,
}

impl Default for LabelParms {
    fn default() -> Self {
        Self {
            text: String::new(),
            pose: Pose::IDENTITY,
            scale: Vector3::new(1.0, 1.0, 1.0),
            color: Vector4::new(1.0, 1.0, 1.0, 1.0),
            bounds: Bounds::ZERO,
            surface: None,
        }
    }
}

impl LabelParms {
    /// A label with the given text and everything else defaulted.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Creates the node under `parent` and applies these parameters.
    pub fn build(&self, store: &mut NodeStore, parent: NodeHandle) -> Result<NodeHandle, UiError> {
        let node = store.create_node();
        store.add_child(parent, node)?;
        store.set_text(node, self.text.clone())?;
        store.set_local_pose(node, self.pose)?;
        store.set_local_scale(node, self.scale)?;
        store.set_color(node, self.color)?;
        store.set_bounds(node, self.bounds)?;
        store.set_surface(node, self.surface)?;
        Ok(node)
    }
}

/// Parameters for a pressable button: a label plus focus hilight and a
/// press action.
#[derive(Clone, Debug)]
pub struct ButtonParms {
    /// The button's label and placement.
    pub label: LabelParms,
    /// Local offset applied at full hilight.
    pub hilight_offset: Vector3<f32>,
    /// Scale multiplier at full hilight.
    pub hilight_scale: f32,
    /// Color blended in at full hilight.
    pub hilight_color: Vector4<f32>,
    /// Sound played on focus gain, rate limited.
    pub gaze_over_sound: Option<String>,
    /// Sound played on release.
    pub click_sound: Option<String>,
}

impl Default for ButtonParms {
    fn default() -> Self {
        Self {
            label: LabelParms::default(),
            hilight_offset: Vector3::new(0.0, 0.0, 0.05),
            hilight_scale: 1.05,
            hilight_color: Vector4::new(1.0, 1.0, 1.0, 1.0),
            gaze_over_sound: None,
            click_sound: None,
        }
    }
}

impl ButtonParms {
    /// A button with the given label text and everything else defaulted.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            label: LabelParms::text(text),
            ..Self::default()
        }
    }

    /// Creates the node under `parent`, wired to report presses to
    /// `menu_root` via `ItemActionComplete`.
    pub fn build(
        &self,
        store: &mut NodeStore,
        parent: NodeHandle,
        menu_root: NodeHandle,
    ) -> Result<NodeHandle, UiError> {
        let node = self.label.build(store, parent)?;
        store.attach_component(
            node,
            Box::new(DefaultComponent::new(
                self.hilight_offset,
                self.hilight_scale,
                self.hilight_color,
                self.gaze_over_sound.clone(),
            )),
        )?;
        store.attach_component(
            node,
            Box::new(ButtonOnUp::new(menu_root, self.click_sound.clone())),
        )?;
        Ok(node)
    }
}

/// A fixed-capacity column of text rows.
///
/// Rows are laid out top to bottom at construction and never move;
/// appending past capacity scrolls the texts up by one instead, so the
/// panel always shows the most recent lines.
#[derive(Debug)]
pub struct ListPanel {
    root: NodeHandle,
    rows: Vec<NodeHandle>,
    filled: usize,
}

impl ListPanel {
    /// Creates a panel under `parent` with `capacity` rows of `row_size`,
    /// separated vertically by `row_gap`.
    pub fn new(
        store: &mut NodeStore,
        parent: NodeHandle,
        capacity: usize,
        row_size: Size,
        row_gap: f64,
    ) -> Result<Self, UiError> {
        let root = store.create_node();
        store.add_child(parent, root)?;

        let mut rows = Vec::with_capacity(capacity);
        for i in 0..capacity {
            // Panel-space rect for this row, origin at the panel's top left.
            let rect = Rect::from_origin_size(
                (0.0, -(i as f64) * (row_size.height + row_gap)),
                row_size,
            );
            let center = rect.center();
            let parms = LabelParms {
                pose: Pose::from_translation(Vector3::new(
                    center.x as f32,
                    center.y as f32,
                    0.0,
                )),
                bounds: Bounds::from_half_extents(
                    (row_size.width / 2.0) as f32,
                    (row_size.height / 2.0) as f32,
                    0.01,
                ),
                ..LabelParms::default()
            };
            rows.push(parms.build(store, root)?);
        }
        Ok(Self {
            root,
            rows,
            filled: 0,
        })
    }

    /// The panel's container node.
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// The row nodes, top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[NodeHandle] {
        &self.rows
    }

    /// Appends a line. When the panel is full the older lines scroll up by
    /// one and the new line takes the bottom row.
    pub fn append_row(&mut self, store: &mut NodeStore, text: &str) -> Result<(), UiError> {
        if self.filled < self.rows.len() {
            store.set_text(self.rows[self.filled], text)?;
            self.filled += 1;
            return Ok(());
        }
        for i in 0..self.rows.len() - 1 {
            let next = store.text(self.rows[i + 1])?.to_owned();
            store.set_text(self.rows[i], next)?;
        }
        if let Some(last) = self.rows.last() {
            store.set_text(*last, text)?;
        }
        Ok(())
    }

    /// The current row texts, top to bottom, filled rows only.
    pub fn texts(&self, store: &NodeStore) -> Result<Vec<String>, UiError> {
        self.rows[..self.filled]
            .iter()
            .map(|row| store.text(*row).map(str::to_owned))
            .collect()
    }
}
