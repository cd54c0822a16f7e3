// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! World configuration.

use kinema_grid::DEFAULT_CELL_SIZE;

use crate::error::WorldError;

/// Tunables fixed for the lifetime of a [`World`](crate::World).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Side length of a spatial hash cell.
    pub cell_size: f64,
    /// Multiplier applied to `z` when building the global z key `z * z_stride + slot`.
    ///
    /// Must exceed the largest slot index for ties to stay ordered by slot.
    pub z_stride: i64,
    /// Vertical acceleration given to entities with gravity, in units per second squared.
    pub gravity: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            z_stride: 100_000,
            gravity: 1.0,
        }
    }
}

impl WorldConfig {
    /// Check the configuration before a world is built from it.
    pub fn validate(&self) -> Result<(), WorldError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(WorldError::InvalidConfig("cell_size must be finite and positive"));
        }
        if self.z_stride <= 0 {
            return Err(WorldError::InvalidConfig("z_stride must be positive"));
        }
        if !self.gravity.is_finite() {
            return Err(WorldError::InvalidConfig("gravity must be finite"));
        }
        Ok(())
    }
}
