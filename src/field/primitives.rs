use crate::math::{abs, sub, v, V3};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Radius floor applied at evaluation time.
pub const MIN_RADIUS: f64 = 1e-3;

/// `offset + amplitude * sin(time * frequency + phase)`
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Oscillator {
    pub offset: f64,
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
}

impl Oscillator {
    pub fn constant(offset: f64) -> Self {
        Oscillator {
            offset,
            ..Default::default()
        }
    }

    pub fn sin(offset: f64, amplitude: f64, frequency: f64, phase: f64) -> Self {
        Oscillator {
            offset,
            amplitude,
            frequency,
            phase,
        }
    }

    pub fn cos(offset: f64, amplitude: f64, frequency: f64, phase: f64) -> Self {
        Self::sin(offset, amplitude, frequency, phase + FRAC_PI_2)
    }

    pub fn value(&self, time: f64) -> f64 {
        self.offset + self.amplitude * (time * self.frequency + self.phase).sin()
    }

    /// Largest magnitude the oscillator can reach.
    pub fn bound(&self) -> f64 {
        self.offset.abs() + self.amplitude.abs()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub x: Oscillator,
    pub y: Oscillator,
    pub z: Oscillator,
}

impl Trajectory {
    pub fn fixed(center: V3) -> Self {
        Trajectory {
            x: Oscillator::constant(center.x),
            y: Oscillator::constant(center.y),
            z: Oscillator::constant(center.z),
        }
    }

    pub fn center(&self, time: f64) -> V3 {
        v(self.x.value(time), self.y.value(time), self.z.value(time))
    }
}

/// Pulsating radius. Valid when `base > 0` and `|amplitude| < base`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pulse {
    pub base: f64,
    #[serde(default)]
    pub amplitude: f64,
    #[serde(default)]
    pub frequency: f64,
    #[serde(default)]
    pub phase: f64,
}

impl Pulse {
    pub fn fixed(radius: f64) -> Self {
        Pulse {
            base: radius,
            amplitude: 0.,
            frequency: 0.,
            phase: 0.,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.base.is_finite()
            && self.amplitude.is_finite()
            && self.base - self.amplitude.abs() > 0.
    }

    pub fn radius(&self, time: f64) -> f64 {
        (self.base + self.amplitude * (time * self.frequency + self.phase).sin()).max(MIN_RADIUS)
    }
}

/// Time-independent description of one sphere in a scene.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveSpec {
    pub trajectory: Trajectory,
    pub radius: Pulse,
    #[serde(default = "default_color")]
    pub color: V3,
}

fn default_color() -> V3 {
    v(1., 1., 1.)
}

impl PrimitiveSpec {
    pub fn at(&self, time: f64) -> Primitive {
        Primitive {
            center: self.trajectory.center(time),
            radius: self.radius.radius(time),
            color: self.color,
        }
    }
}

/// A sphere frozen at one instant. Rebuilt on every evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Primitive {
    pub center: V3,
    pub radius: f64,
    pub color: V3,
}

impl Primitive {
    pub fn sdf(&self, p: &V3) -> f64 {
        sd_sphere(p, &self.center, self.radius)
    }
}

pub fn sd_sphere(p: &V3, center: &V3, radius: f64) -> f64 {
    abs(&sub(p, center)) - radius
}
