// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Biased-random helpers for pitch jitter and queue selection.

use rand::Rng;

/// Returns a float uniformly distributed in `[min, max)`.
///
/// `min` must be strictly less than `max`.
pub fn float_between(min: f32, max: f32) -> f32 {
    float_between_with(&mut rand::thread_rng(), min, max)
}

/// Same as [`float_between`], but draws from the given generator.
pub fn float_between_with<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    rng.gen_range(min..max)
}

/// Returns an integer in `[0, bound)`, biased toward 0.
///
/// Draws `u` uniform in `[0, 1)` and returns `floor(u^power * bound)`. A
/// power above 1 concentrates probability mass near 0 while still allowing
/// larger results with falling probability; the larger the power, the
/// steeper the falloff. `bound` must be nonzero.
pub fn mapped_index(bound: usize, power: f64) -> usize {
    mapped_index_with(&mut rand::thread_rng(), bound, power)
}

/// Same as [`mapped_index`], but draws from the given generator.
pub fn mapped_index_with<R: Rng>(rng: &mut R, bound: usize, power: f64) -> usize {
    let u: f64 = rng.gen_range(0.0..1.0);
    let index = (u.powf(power) * bound as f64) as usize;

    // u < 1 keeps the product below bound; the clamp only guards against
    // float rounding at the top of the range.
    index.min(bound.saturating_sub(1))
}
