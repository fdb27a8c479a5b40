//! Sun position along the daylight arc.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// Sunrise, sunset and the moment to place, all epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolarInput {
    pub sunrise: i64,
    pub sunset: i64,
    pub now: i64,
}

/// Half-circle the sun travels on, in the caller's coordinate space
/// (y grows downwards, as on screen).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcGeometry {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl Default for ArcGeometry {
    fn default() -> Self {
        Self { center_x: 0.0, center_y: 0.0, radius: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArcPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarPosition {
    pub progress: f64,
    pub angle_radians: f64,
    pub x: f64,
    pub y: f64,
}

/// Fraction of daylight elapsed at `now`, clamped to `[0, 1]`.
pub fn compute_progress(sunrise: i64, sunset: i64, now: i64) -> Result<f64, WeatherError> {
    if sunset <= sunrise {
        return Err(WeatherError::InvalidInterval { sunrise, sunset });
    }

    if now <= sunrise {
        return Ok(0.0);
    }
    if now >= sunset {
        return Ok(1.0);
    }

    Ok((now - sunrise) as f64 / (sunset - sunrise) as f64)
}

fn arc_angle(progress: f64) -> f64 {
    PI * (1.0 - progress)
}

/// Progress 0 sits at the left end of the arc, 1 at the right end, 0.5 at the top.
pub fn compute_arc_position(progress: f64, geometry: ArcGeometry) -> ArcPoint {
    let angle = arc_angle(progress);
    ArcPoint {
        x: geometry.center_x + geometry.radius * angle.cos(),
        y: geometry.center_y - geometry.radius * angle.sin(),
    }
}

pub fn solar_position(input: SolarInput, geometry: ArcGeometry) -> Result<SolarPosition, WeatherError> {
    let progress = compute_progress(input.sunrise, input.sunset, input.now)?;
    let ArcPoint { x, y } = compute_arc_position(progress, geometry);

    Ok(SolarPosition { progress, angle_radians: arc_angle(progress), x, y })
}
