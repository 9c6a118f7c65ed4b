/*
 * SPDX-FileCopyrightText: 2026 The sparse-heatmap developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The `hot` colormap and value normalization.
//!
//! The colormap goes from black through red and yellow to white. Each channel
//! is piecewise linear; the breakpoints are those of the classic `hot`
//! colormap of MATLAB and matplotlib.

use itertools::{Itertools, MinMaxResult};
use ndarray::ArrayBase;
use plotters::style::RGBColor;

/// A piecewise-linear channel: a list of `(position, intensity)` pairs with
/// increasing positions starting at 0 and ending at 1.
type Channel = &'static [(f64, f64)];

const RED: Channel = &[(0.0, 0.0416), (0.365079, 1.0), (1.0, 1.0)];
const GREEN: Channel = &[(0.0, 0.0), (0.365079, 0.0), (0.746032, 1.0), (1.0, 1.0)];
const BLUE: Channel = &[(0.0, 0.0), (0.746032, 0.0), (1.0, 1.0)];

fn interpolate(channel: Channel, t: f64) -> f64 {
    for (&(x0, y0), &(x1, y1)) in channel.iter().tuple_windows() {
        if t <= x1 {
            return y0 + (y1 - y0) * (t - x0) / (x1 - x0);
        }
    }
    channel.last().map_or(0.0, |&(_, y)| y)
}

fn to_u8(intensity: f64) -> u8 {
    (intensity.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// The range of values mapped onto the colormap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns the range spanned by the finite values of `data`.
    ///
    /// If there are no finite values the range is `[0, 0]`.
    pub fn of<S, D>(data: &ArrayBase<S, D>) -> Self
    where
        S: ndarray::Data<Elem = f64>,
        D: ndarray::Dimension,
    {
        match data.iter().copied().filter(|x| x.is_finite()).minmax() {
            MinMaxResult::NoElements => Self::new(0.0, 0.0),
            MinMaxResult::OneElement(x) => Self::new(x, x),
            MinMaxResult::MinMax(min, max) => Self::new(min, max),
        }
    }

    /// Whether the range is a single point.
    pub fn is_degenerate(&self) -> bool {
        self.max <= self.min
    }
}

/// The `hot` colormap.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hot;

impl Hot {
    /// Returns the color at position `t` of the colormap.
    ///
    /// Values outside `[0, 1]` are clamped; NaN maps to the bottom color.
    pub fn color(&self, t: f64) -> RGBColor {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        RGBColor(
            to_u8(interpolate(RED, t)),
            to_u8(interpolate(GREEN, t)),
            to_u8(interpolate(BLUE, t)),
        )
    }

    /// Maps `value` into `[0, 1]` according to `range`.
    ///
    /// Every value maps to 0 when the range is degenerate.
    pub fn normalize(&self, value: f64, range: ValueRange) -> f64 {
        if range.is_degenerate() {
            return 0.0;
        }
        ((value - range.min) / (range.max - range.min)).clamp(0.0, 1.0)
    }

    /// Returns the color of `value` within `range`.
    pub fn color_of(&self, value: f64, range: ValueRange) -> RGBColor {
        self.color(self.normalize(value, range))
    }
}
