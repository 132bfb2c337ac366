// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Tile Config Module
//!
//! Construction-time parameters of the tile operator.

use crate::enums::error::OpError;

/// # TileConfig
///
/// Axes to repeat along and how many times.
///
/// ### Properties
/// - `axes`: axis per entry. Negative values count from the end and are
///   resolved against the input rank at shape inference.
/// - `tiles`: repeat factor per entry, must be positive.
///
/// Both lists must be non-empty and of equal length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TileConfig {
    pub axes: Vec<isize>,
    pub tiles: Vec<isize>,
}

impl TileConfig {
    pub fn new(axes: Vec<isize>, tiles: Vec<isize>) -> Self {
        TileConfig { axes, tiles }
    }

    /// Repeat one axis `tiles` times.
    pub fn single(axis: isize, tiles: isize) -> Self {
        TileConfig { axes: vec![axis], tiles: vec![tiles] }
    }

    /// Adds another `(axis, tiles)` entry.
    pub fn with(mut self, axis: isize, tiles: isize) -> Self {
        self.axes.push(axis);
        self.tiles.push(tiles);
        self
    }

    /// Checks list lengths and factors, returning the `(axis, factor)` pairs.
    ///
    /// Axes stay unresolved, the input rank is not known yet.
    pub fn validate(&self, op: &'static str) -> Result<Vec<(isize, usize)>, OpError> {
        if self.axes.len() != self.tiles.len() {
            return Err(OpError::config(
                op,
                format!(
                    "number of tiles ({}) must equal number of axes ({})",
                    self.tiles.len(),
                    self.axes.len()
                ),
            ));
        }
        if self.tiles.is_empty() {
            return Err(OpError::config(op, "number of tiles must be positive"));
        }
        self.axes
            .iter()
            .zip(&self.tiles)
            .map(|(&axis, &tiles)| {
                if tiles <= 0 {
                    Err(OpError::config(
                        op,
                        format!("tiles for axis {axis} must be positive, got {tiles}"),
                    ))
                } else {
                    Ok((axis, tiles as usize))
                }
            })
            .collect()
    }
}
