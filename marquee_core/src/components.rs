// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in components: focus hilighting, fade-driven alpha, button actions,
//! and sound rate limiting.

use cgmath::{Vector3, Vector4};

use crate::component::{Component, EventCtx, SoundPlayer};
use crate::easing::{EaseFunc, ease};
use crate::error::UiError;
use crate::event::{Event, EventFlags, EventStatus, EventType};
use crate::fader::{Fader, SineFader};
use crate::math::Pose;
use crate::node::NodeHandle;

fn lerp_color(a: Vector4<f32>, b: Vector4<f32>, t: f32) -> Vector4<f32> {
    a + (b - a) * t
}

/// Suppresses replays of a sound effect within a limit window.
///
/// The first play always goes through.
#[derive(Clone, Copy, Debug)]
pub struct SoundLimiter {
    last_play_time: f64,
}

impl Default for SoundLimiter {
    fn default() -> Self {
        Self {
            last_play_time: f64::NEG_INFINITY,
        }
    }
}

impl SoundLimiter {
    /// Creates a limiter that will allow its first play immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plays `name` unless a play happened within the last `limit_seconds`.
    pub fn play(
        &mut self,
        sounds: &mut dyn SoundPlayer,
        now: f64,
        name: &str,
        limit_seconds: f64,
    ) {
        if now - self.last_play_time < limit_seconds {
            return;
        }
        self.last_play_time = now;
        sounds.play(name);
    }
}

/// Focus hilight bookkeeping for ordinary menu items.
///
/// On `FocusGained` the component ramps up a sine fade (playing a
/// rate-limited gaze-over sound); on `FocusLost` it ramps back down. Each
/// `FrameUpdate` the current fade alpha blends the node's color toward the
/// hilight color and pushes the node along the hilight offset.
#[derive(Debug)]
pub struct DefaultComponent {
    flags: EventFlags,
    fader: SineFader,
    fade_rate: f32,
    hilight_offset: Vector3<f32>,
    hilight_scale: f32,
    hilight_color: Vector4<f32>,
    gaze_over_sound: Option<String>,
    limiter: SoundLimiter,
    base_pose: Pose,
    base_scale: Vector3<f32>,
    base_color: Vector4<f32>,
    last_alpha: f32,
}

impl DefaultComponent {
    /// The gap between gaze-over sound plays, in seconds.
    pub const GAZE_OVER_SOUND_LIMIT: f64 = 0.25;

    /// Creates a hilight component.
    ///
    /// `hilight_offset` is added to the node's local position at full
    /// hilight; `hilight_scale` multiplies its local scale.
    #[must_use]
    pub fn new(
        hilight_offset: Vector3<f32>,
        hilight_scale: f32,
        hilight_color: Vector4<f32>,
        gaze_over_sound: Option<String>,
    ) -> Self {
        Self {
            flags: EventFlags::of(&[
                EventType::Init,
                EventType::FocusGained,
                EventType::FocusLost,
                EventType::FrameUpdate,
            ]),
            fader: SineFader::new(0.0),
            fade_rate: 4.0,
            hilight_offset,
            hilight_scale,
            hilight_color,
            gaze_over_sound,
            limiter: SoundLimiter::new(),
            base_pose: Pose::IDENTITY,
            base_scale: Vector3::new(1.0, 1.0, 1.0),
            base_color: Vector4::new(1.0, 1.0, 1.0, 1.0),
            last_alpha: 0.0,
        }
    }

    /// Current hilight alpha in `[0, 1]`.
    #[must_use]
    pub fn hilight_alpha(&self) -> f32 {
        self.fader.final_alpha()
    }

    fn apply_hilight(
        &mut self,
        ctx: &mut EventCtx<'_>,
        self_handle: NodeHandle,
        alpha: f32,
    ) -> Result<(), UiError> {
        let mut pose = self.base_pose;
        pose.position += self.hilight_offset * alpha;
        ctx.store.set_local_pose(self_handle, pose)?;

        let scale = 1.0 + (self.hilight_scale - 1.0) * alpha;
        ctx.store
            .set_local_scale(self_handle, self.base_scale * scale)?;

        let color = lerp_color(self.base_color, self.hilight_color, alpha);
        ctx.store.set_color(self_handle, color)?;
        Ok(())
    }
}

impl Default for DefaultComponent {
    fn default() -> Self {
        Self::new(
            Vector3::new(0.0, 0.0, 0.05),
            1.05,
            Vector4::new(1.0, 1.0, 1.0, 1.0),
            None,
        )
    }
}

impl Component for DefaultComponent {
    fn type_name(&self) -> &'static str {
        "DefaultComponent"
    }

    fn event_flags(&self) -> EventFlags {
        self.flags
    }

    fn on_event(
        &mut self,
        ctx: &mut EventCtx<'_>,
        self_handle: NodeHandle,
        event: &Event,
    ) -> Result<EventStatus, UiError> {
        match event.event_type {
            EventType::Init => {
                self.base_pose = ctx.store.local_pose(self_handle)?;
                self.base_scale = ctx.store.local_scale(self_handle)?;
                self.base_color = ctx.store.color(self_handle)?;
                // Init is one-shot.
                self.flags = self.flags.without(EventType::Init);
                Ok(EventStatus::Alive)
            }
            EventType::FocusGained => {
                if let Some(name) = &self.gaze_over_sound {
                    let name = name.clone();
                    self.limiter
                        .play(ctx.sounds, ctx.now, &name, Self::GAZE_OVER_SOUND_LIMIT);
                }
                self.fader.start_fade_in();
                Ok(EventStatus::Consumed)
            }
            EventType::FocusLost => {
                self.fader.start_fade_out();
                Ok(EventStatus::Consumed)
            }
            EventType::FrameUpdate => {
                self.fader.update(self.fade_rate, ctx.dt);
                let alpha = self.fader.final_alpha();
                if (alpha - self.last_alpha).abs() > f32::EPSILON {
                    self.apply_hilight(ctx, self_handle, alpha)?;
                    self.last_alpha = alpha;
                }
                Ok(EventStatus::Alive)
            }
            _ => Ok(EventStatus::Alive),
        }
    }

    fn as_any(&self) -> &dyn core::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn core::any::Any {
        self
    }
}

/// Drives a node's alpha from a [`Fader`], optionally shaped by an
/// [`EaseFunc`].
///
/// With [`EaseFunc::None`] the fader alpha multiplies the node's base alpha
/// directly; any other function is evaluated at the fader alpha as its
/// normalized time.
#[derive(Debug)]
pub struct FadeComponent {
    flags: EventFlags,
    fader: Fader,
    fade_rate: f32,
    ease_func: EaseFunc,
    base_color: Vector4<f32>,
    last_alpha: f32,
}

impl FadeComponent {
    /// Creates a fade component with the given ramp rate (alpha per second).
    #[must_use]
    pub fn new(fade_rate: f32, ease_func: EaseFunc) -> Self {
        Self {
            flags: EventFlags::of(&[EventType::Init, EventType::FrameUpdate]),
            fader: Fader::new(1.0),
            fade_rate,
            ease_func,
            base_color: Vector4::new(1.0, 1.0, 1.0, 1.0),
            last_alpha: f32::NAN,
        }
    }

    /// Begins fading the node in.
    pub fn start_fade_in(&mut self) {
        self.fader.start_fade_in();
    }

    /// Begins fading the node out.
    pub fn start_fade_out(&mut self) {
        self.fader.start_fade_out();
    }

    /// The underlying fader.
    #[must_use]
    pub fn fader(&self) -> &Fader {
        &self.fader
    }
}

impl Component for FadeComponent {
    fn type_name(&self) -> &'static str {
        "FadeComponent"
    }

    fn event_flags(&self) -> EventFlags {
        self.flags
    }

    fn on_event(
        &mut self,
        ctx: &mut EventCtx<'_>,
        self_handle: NodeHandle,
        event: &Event,
    ) -> Result<EventStatus, UiError> {
        match event.event_type {
            EventType::Init => {
                self.base_color = ctx.store.color(self_handle)?;
                self.flags = self.flags.without(EventType::Init);
                Ok(EventStatus::Alive)
            }
            EventType::FrameUpdate => {
                self.fader.update(self.fade_rate, ctx.dt);
                let alpha = self.fader.alpha();
                if alpha != self.last_alpha {
                    let b = self.base_color;
                    let color = match self.ease_func {
                        EaseFunc::None => Vector4::new(b.x, b.y, b.z, b.w * alpha),
                        func => ease(func, b, alpha),
                    };
                    ctx.store.set_color(self_handle, color)?;
                    self.last_alpha = alpha;
                }
                Ok(EventStatus::Alive)
            }
            _ => Ok(EventStatus::Alive),
        }
    }

    fn as_any(&self) -> &dyn core::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn core::any::Any {
        self
    }
}

/// Button action: propagates a trigger release on the item up to its menu.
///
/// On `TouchUp` the component queues an `ItemActionComplete` event aimed at
/// the menu root, carrying the item's handle in `other`. `TouchDown` is
/// consumed so it does not fall through to ancestors.
#[derive(Debug)]
pub struct ButtonOnUp {
    flags: EventFlags,
    menu_root: NodeHandle,
    click_sound: Option<String>,
}

impl ButtonOnUp {
    /// Creates a button action reporting to `menu_root`.
    #[must_use]
    pub fn new(menu_root: NodeHandle, click_sound: Option<String>) -> Self {
        Self {
            flags: EventFlags::of(&[EventType::TouchDown, EventType::TouchUp]),
            menu_root,
            click_sound,
        }
    }
}

impl Component for ButtonOnUp {
    fn type_name(&self) -> &'static str {
        "ButtonOnUp"
    }

    fn event_flags(&self) -> EventFlags {
        self.flags
    }

    fn on_event(
        &mut self,
        ctx: &mut EventCtx<'_>,
        self_handle: NodeHandle,
        event: &Event,
    ) -> Result<EventStatus, UiError> {
        match event.event_type {
            EventType::TouchDown => Ok(EventStatus::Consumed),
            EventType::TouchUp => {
                if let Some(name) = &self.click_sound {
                    ctx.sounds.play(name);
                }
                ctx.queue.push(
                    Event::direct(EventType::ItemActionComplete, self.menu_root)
                        .with_other(self_handle),
                );
                Ok(EventStatus::Consumed)
            }
            _ => Ok(EventStatus::Alive),
        }
    }

    fn as_any(&self) -> &dyn core::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn core::any::Any {
        self
    }
}
