// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-based alpha interpolation for menu open/close transitions.

use core::f32::consts::FRAC_PI_2;

/// Direction a [`Fader`] is currently moving in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FadeState {
    /// Not fading. The alpha value holds.
    #[default]
    None,
    /// Fading was suspended mid-flight; [`Fader::unpause`] resumes it.
    Paused,
    /// Alpha is rising toward 1.
    In,
    /// Alpha is falling toward 0.
    Out,
}

/// Interpolates a scalar alpha in `[0, 1]` at a caller-supplied rate.
///
/// The fader is driven once per frame via [`update`](Self::update). When the
/// alpha reaches an endpoint the state returns to [`FadeState::None`] on that
/// same update, so callers can detect completion by watching the state edge.
#[derive(Clone, Debug)]
pub struct Fader {
    state: FadeState,
    pre_pause_state: FadeState,
    start_alpha: f32,
    alpha: f32,
}

impl Fader {
    /// Creates a fader holding at `start_alpha`.
    #[must_use]
    pub fn new(start_alpha: f32) -> Self {
        let start_alpha = start_alpha.clamp(0.0, 1.0);
        Self {
            state: FadeState::None,
            pre_pause_state: FadeState::None,
            start_alpha,
            alpha: start_alpha,
        }
    }

    /// The current interpolation state.
    #[must_use]
    pub fn state(&self) -> FadeState {
        self.state
    }

    /// The raw linear alpha in `[0, 1]`.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// The alpha as presented to consumers. The base fader is linear;
    /// [`SineFader`] shapes it.
    #[must_use]
    pub fn final_alpha(&self) -> f32 {
        self.alpha
    }

    /// Begins fading toward 1. No-op at alpha 1 while idle.
    pub fn start_fade_in(&mut self) {
        if self.state == FadeState::None && self.alpha >= 1.0 {
            return;
        }
        self.state = FadeState::In;
    }

    /// Begins fading toward 0. No-op at alpha 0 while idle.
    pub fn start_fade_out(&mut self) {
        if self.state == FadeState::None && self.alpha <= 0.0 {
            return;
        }
        self.state = FadeState::Out;
    }

    /// Suspends an in-flight fade, remembering its direction.
    pub fn pause(&mut self) {
        if matches!(self.state, FadeState::In | FadeState::Out) {
            self.pre_pause_state = self.state;
            self.state = FadeState::Paused;
        }
    }

    /// Resumes the fade that [`pause`](Self::pause) suspended.
    pub fn unpause(&mut self) {
        if self.state == FadeState::Paused {
            self.state = self.pre_pause_state;
            self.pre_pause_state = FadeState::None;
        }
    }

    /// Sets the alpha directly without changing the fade state.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    /// True while fading in, or idle at full alpha.
    #[must_use]
    pub fn is_fading_in_or_faded_in(&self) -> bool {
        self.state == FadeState::In || (self.state == FadeState::None && self.alpha >= 1.0)
    }

    /// Snaps the alpha back to the construction value and stops fading.
    pub fn reset(&mut self) {
        self.state = FadeState::None;
        self.pre_pause_state = FadeState::None;
        self.alpha = self.start_alpha;
    }

    /// Jumps an in-flight fade straight to its endpoint.
    pub fn force_finish(&mut self) {
        match self.state {
            FadeState::In => self.alpha = 1.0,
            FadeState::Out => self.alpha = 0.0,
            FadeState::None | FadeState::Paused => {}
        }
        self.state = FadeState::None;
    }

    /// Advances the fade by `delta_seconds` at `fade_rate` units of alpha
    /// per second. Does nothing in the `None` and `Paused` states.
    pub fn update(&mut self, fade_rate: f32, delta_seconds: f32) {
        let direction = match self.state {
            FadeState::In => 1.0,
            FadeState::Out => -1.0,
            FadeState::None | FadeState::Paused => return,
        };
        self.alpha = (self.alpha + fade_rate * delta_seconds * direction).clamp(0.0, 1.0);
        let finished = (self.state == FadeState::In && self.alpha >= 1.0)
            || (self.state == FadeState::Out && self.alpha <= 0.0);
        if finished {
            self.state = FadeState::None;
        }
    }
}

impl Default for Fader {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// A [`Fader`] whose presented alpha follows a quarter sine curve, easing
/// the tail of the fade instead of stopping abruptly.
#[derive(Clone, Debug, Default)]
pub struct SineFader {
    fader: Fader,
}

impl SineFader {
    /// Creates a sine fader holding at `start_alpha`.
    #[must_use]
    pub fn new(start_alpha: f32) -> Self {
        Self {
            fader: Fader::new(start_alpha),
        }
    }

    /// The shaped alpha: `sin(alpha * pi / 2)`.
    #[must_use]
    pub fn final_alpha(&self) -> f32 {
        (self.fader.alpha() * FRAC_PI_2).sin()
    }
}

impl core::ops::Deref for SineFader {
    type Target = Fader;

    fn deref(&self) -> &Fader {
        &self.fader
    }
}

impl core::ops::DerefMut for SineFader {
    fn deref_mut(&mut self) -> &mut Fader {
        &mut self.fader
    }
}
