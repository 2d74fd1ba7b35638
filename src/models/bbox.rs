// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Map viewport bounding box used to filter pin listings.

use geo::{coord, Intersects, Rect};
use std::str::FromStr;

/// Axis-aligned longitude/latitude box. Edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    rect: Rect<f64>,
}

impl BoundingBox {
    pub fn new(min_long: f64, min_lat: f64, max_long: f64, max_lat: f64) -> Result<Self, String> {
        let values = [min_long, min_lat, max_long, max_lat];
        if values.iter().any(|v| !v.is_finite()) {
            return Err("bbox values must be finite numbers".to_string());
        }
        if !(-180.0..=180.0).contains(&min_long) || !(-180.0..=180.0).contains(&max_long) {
            return Err("bbox longitudes must be within [-180, 180]".to_string());
        }
        if !(-90.0..=90.0).contains(&min_lat) || !(-90.0..=90.0).contains(&max_lat) {
            return Err("bbox latitudes must be within [-90, 90]".to_string());
        }
        if min_long > max_long || min_lat > max_lat {
            return Err("bbox minimum must not exceed maximum".to_string());
        }

        Ok(Self {
            rect: Rect::new(
                coord! { x: min_long, y: min_lat },
                coord! { x: max_long, y: max_lat },
            ),
        })
    }

    /// Whether a longitude/latitude point lies inside or on the box.
    pub fn contains(&self, point: &geo::Point<f64>) -> bool {
        self.rect.intersects(point)
    }
}

impl FromStr for BoundingBox {
    type Err = String;

    /// Parse `minLong,minLat,maxLong,maxLat`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| "bbox must be four comma-separated numbers".to_string())?;

        match parts.as_slice() {
            [min_long, min_lat, max_long, max_lat] => {
                Self::new(*min_long, *min_lat, *max_long, *max_lat)
            }
            _ => Err("bbox must be four comma-separated numbers".to_string()),
        }
    }
}
