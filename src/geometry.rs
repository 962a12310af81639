// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Planar geometry helpers

use crate::types::Coordinates;

/// Euclidean distance between two points
#[must_use]
pub fn distance(a: Coordinates, b: Coordinates) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}
