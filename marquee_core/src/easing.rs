// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure easing curves for blending color and alpha over time.
//!
//! Every function here is deterministic and side-effect free: identical
//! `(color, t)` inputs always produce identical outputs, which is what
//! visual-regression tests rely on. The in/out curves take `t` in `[0, 1]`,
//! rise to `1` at `t = 0.5`, and fall back to `0` at `t = 1`.

use cgmath::Vector4;

/// Selects how a color is blended over a normalized lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EaseFunc {
    /// Use the initial color and alpha unmodified.
    #[default]
    None,
    /// Ease color and alpha in and out, linear.
    InOutLinear,
    /// Ease color and alpha in and out, cubic.
    InOutCubic,
    /// Ease color and alpha in and out, quadratic.
    InOutQuadratic,
    /// Ease only the alpha channel in and out, linear.
    AlphaInOutLinear,
    /// Ease only the alpha channel in and out, cubic.
    AlphaInOutCubic,
    /// Ease only the alpha channel in and out, quadratic.
    AlphaInOutQuadratic,
}

/// Rises from 0 to 1 at `t = 0.5`, then falls back to 0.
#[inline]
#[must_use]
pub fn ease_in_out_linear(t: f32) -> f32 {
    if t <= 0.5 {
        2.0 * t
    } else {
        1.0 - 2.0 * (t - 0.5)
    }
}

/// Quadratic rise to 1 at `t = 0.5`, quadratic fall after.
#[inline]
#[must_use]
pub fn ease_in_out_quadratic(t: f32) -> f32 {
    if t <= 0.5 {
        2.0 * t * t
    } else {
        1.0 - 2.0 * (t - 0.5) * (t - 0.5)
    }
}

/// Cubic rise to 1 at `t = 0.5`, cubic fall after.
#[inline]
#[must_use]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t <= 0.5 {
        2.0 * t * t * t
    } else {
        let t = t - 0.5;
        1.0 - 2.0 * t * t * t
    }
}

/// `y = t^2`.
#[inline]
#[must_use]
pub fn ease_in_quadratic(t: f32) -> f32 {
    t * t
}

/// `y = t^3`.
#[inline]
#[must_use]
pub fn ease_in_cubic(t: f32) -> f32 {
    t * t * t
}

/// `y = 1 - (1 - t)^3`. Fast start, slow settle.
#[inline]
#[must_use]
pub fn ease_in_cubic_inverted(t: f32) -> f32 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Blends `color` according to `func` at normalized time `t`.
///
/// The `InOut*` variants scale all four channels; the `AlphaInOut*`
/// variants scale only the alpha channel.
#[must_use]
pub fn ease(func: EaseFunc, color: Vector4<f32>, t: f32) -> Vector4<f32> {
    match func {
        EaseFunc::None => color,
        EaseFunc::InOutLinear => color * ease_in_out_linear(t),
        EaseFunc::InOutCubic => color * ease_in_out_cubic(t),
        EaseFunc::InOutQuadratic => color * ease_in_out_quadratic(t),
        EaseFunc::AlphaInOutLinear => {
            Vector4::new(color.x, color.y, color.z, color.w * ease_in_out_linear(t))
        }
        EaseFunc::AlphaInOutCubic => {
            Vector4::new(color.x, color.y, color.z, color.w * ease_in_out_cubic(t))
        }
        EaseFunc::AlphaInOutQuadratic => {
            Vector4::new(color.x, color.y, color.z, color.w * ease_in_out_quadratic(t))
        }
    }
}

/// Domain-clamped linear interpolation between two values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Lerp {
    /// Domain start.
    pub start_domain: f64,
    /// Domain end.
    pub end_domain: f64,
    /// Value at the domain start.
    pub start_value: f64,
    /// Value at the domain end.
    pub end_value: f64,
}

impl Lerp {
    /// Sets the interpolation endpoints.
    pub fn set(&mut self, start_domain: f64, start_value: f64, end_domain: f64, end_value: f64) {
        self.start_domain = start_domain;
        self.start_value = start_value;
        self.end_domain = end_domain;
        self.end_value = end_value;
    }

    /// Evaluates at `domain`, clamped to the configured range.
    #[must_use]
    pub fn value(&self, domain: f64) -> f64 {
        let f = ((domain - self.start_domain) / (self.end_domain - self.start_domain))
            .clamp(0.0, 1.0);
        self.start_value * (1.0 - f) + self.end_value * f
    }
}
