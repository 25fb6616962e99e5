//! Stable per-body colors.
//!
//! Body ids are sorted ascending and spread evenly over a blue → red "jet"
//! spectrum, so the same body set always yields the same colors regardless
//! of row order.

use crate::loader::TrajectoryTable;
use image::Rgba;
use std::collections::{BTreeMap, BTreeSet};

/// Color used for a body missing from the assignment.
pub const FALLBACK_COLOR: Rgba<u8> = Rgba([128, 128, 128, 255]);

#[derive(Debug, Clone, PartialEq)]
pub struct ColorAssignment {
    colors: BTreeMap<u32, Rgba<u8>>,
}

impl ColorAssignment {
    pub fn from_bodies(bodies: &BTreeSet<u32>) -> Self {
        let count = bodies.len();
        let colors = bodies
            .iter()
            .enumerate()
            .map(|(i, &body)| (body, jet(spectrum_position(i, count))))
            .collect();
        Self { colors }
    }

    pub fn for_table(table: &TrajectoryTable) -> Self {
        Self::from_bodies(&table.body_ids())
    }

    pub fn color_of(&self, body: u32) -> Option<Rgba<u8>> {
        self.colors.get(&body).copied()
    }

    pub fn color_or_fallback(&self, body: u32) -> Rgba<u8> {
        self.color_of(body).unwrap_or(FALLBACK_COLOR)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, Rgba<u8>)> + '_ {
        self.colors.iter().map(|(&body, &color)| (body, color))
    }
}

/// Position of the `index`-th of `count` samples in [0, 1].
fn spectrum_position(index: usize, count: usize) -> f64 {
    if count <= 1 {
        0.0
    } else {
        index as f64 / (count - 1) as f64
    }
}

/// Piecewise-linear jet colormap.
fn jet(t: f64) -> Rgba<u8> {
    let t = t.clamp(0.0, 1.0);
    let channel = |offset: f64| (1.5 - (4.0 * t - offset).abs()).clamp(0.0, 1.0);
    let to_u8 = |v: f64| (v * 255.0).round() as u8;
    Rgba([to_u8(channel(3.0)), to_u8(channel(2.0)), to_u8(channel(1.0)), 255])
}
