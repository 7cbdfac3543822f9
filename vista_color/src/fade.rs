// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mixing factors for fading out trajectories.
//!
//! Each function maps the relative position along a trajectory, `[0, 1]`, to
//! the proportion of the fade-out color. Inputs outside that range are clamped.

/// `f(x) = x`
pub fn fade_out_linear(progress: f64) -> f64 {
    progress.clamp(0.0, 1.0)
}

/// `f(x) = x²`, slow to start, so most of the trajectory keeps its color.
pub fn fade_out_quadratic(progress: f64) -> f64 {
    let x = progress.clamp(0.0, 1.0);
    x * x
}

/// `f(x) = log10(9x + 1)`, which fades quickly near the start.
pub fn fade_out_logarithmic(progress: f64) -> f64 {
    (9.0 * progress.clamp(0.0, 1.0) + 1.0).log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for f in [fade_out_linear, fade_out_quadratic, fade_out_logarithmic] {
            assert!(f(0.0).abs() < 1e-12);
            assert!((f(1.0) - 1.0).abs() < 1e-12);
            assert!(f(-4.0).abs() < 1e-12);
            assert!((f(7.0) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn ordering_of_curves() {
        let x = 0.4;
        assert!(fade_out_quadratic(x) < fade_out_linear(x));
        assert!(fade_out_linear(x) < fade_out_logarithmic(x));
    }
}
