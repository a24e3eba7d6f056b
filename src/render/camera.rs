use crate::error::ConfigError;
use crate::marcher::Ray;
use crate::math::{abs, add, cross, dist, is_finite3, mul, normalize, sub, v2, V2, V3, B2};
use serde::{Deserialize, Serialize};

/// Pinhole camera looking from `position` at `target`, world up `+Y`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: V3,
    pub target: V3,
    /// Vertical field of view.
    pub fov_degrees: f64,
}

impl Camera {
    /// Camera whose image plane sits `focal` units in front of the eye.
    pub fn with_focal_length(position: V3, target: V3, focal: f64) -> Self {
        Camera {
            position,
            target,
            fov_degrees: 2. * (1. / focal).atan().to_degrees(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov_degrees > 0. && self.fov_degrees < 180.) {
            return Err(ConfigError::InvalidCamera(format!(
                "field of view must lie in (0, 180) degrees, got {}",
                self.fov_degrees
            )));
        }
        if !is_finite3(&self.position) || !is_finite3(&self.target) {
            return Err(ConfigError::InvalidCamera("non-finite position or target".into()));
        }
        if dist(&self.target, &self.position) < 1e-9 {
            return Err(ConfigError::InvalidCamera("position and target coincide".into()));
        }
        let forward = normalize(&sub(&self.target, &self.position));
        if abs(&cross(&forward, &B2)) < 1e-9 {
            return Err(ConfigError::InvalidCamera("view direction is parallel to world up".into()));
        }
        Ok(())
    }

    /// Primary ray through screen coordinate `uv` (see [`screen_uv`]).
    pub fn ray(&self, uv: V2) -> Ray {
        let forward = normalize(&sub(&self.target, &self.position));
        let right = normalize(&cross(&forward, &B2));
        let up = cross(&right, &forward);
        let half = (self.fov_degrees.to_radians() * 0.5).tan();
        let dir = add(
            &forward,
            &add(&mul(uv.x * half, &right), &mul(uv.y * half, &up)),
        );
        Ray::new(self.position, dir)
    }
}

/// Pixel center to screen coordinates: origin at the image center, `y` up,
/// scaled so the image height spans one unit.
pub fn screen_uv(px: f64, py: f64, width: u32, height: u32) -> V2 {
    let (w, h) = (width as f64, height as f64);
    v2((px - 0.5 * w) / h, ((h - py) - 0.5 * h) / h)
}
