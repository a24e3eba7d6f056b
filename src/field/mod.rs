//! Implicit scene description: animated spheres folded with a polynomial
//! smooth minimum.

pub mod primitives;

use crate::math::{mix, mix3, v, V3};
use serde::{Deserialize, Serialize};

pub use primitives::{Oscillator, Primitive, PrimitiveSpec, Pulse, Trajectory};

/// Largest number of primitives a scene may fold.
pub const MAX_PRIMITIVES: usize = 12;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSample {
    pub distance: f64,
    pub color: V3,
}

/// A time-dependent signed distance field.
pub trait Field {
    fn evaluate(&self, p: &V3, time: f64) -> FieldSample;

    fn distance(&self, p: &V3, time: f64) -> f64 {
        self.evaluate(p, time).distance
    }
}

/// Polynomial smooth minimum. Returns the blended distance and the weight `h`
/// given to `d1`. Requires `k > 0`.
pub fn smooth_union_weight(d1: f64, d2: f64, k: f64) -> (f64, f64) {
    let h = (0.5 + 0.5 * (d2 - d1) / k).clamp(0., 1.);
    (mix(d2, d1, h) - k * h * (1. - h), h)
}

pub fn smooth_union(d1: f64, d2: f64, k: f64) -> f64 {
    smooth_union_weight(d1, d2, k).0
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Palette {
    /// Per channel `base + amplitude * sin(time * frequency + phase)`.
    Animated {
        base: V3,
        #[serde(default = "zero")]
        amplitude: V3,
        #[serde(default = "zero")]
        frequency: V3,
        #[serde(default = "zero")]
        phase: V3,
    },
    /// Primitive colors folded with the distance blend weights.
    PerPrimitive,
}

fn zero() -> V3 {
    v(0., 0., 0.)
}

impl Palette {
    pub fn constant(color: V3) -> Self {
        Palette::Animated {
            base: color,
            amplitude: zero(),
            frequency: zero(),
            phase: zero(),
        }
    }

    fn animated(&self, time: f64) -> Option<V3> {
        match self {
            Palette::Animated {
                base,
                amplitude,
                frequency,
                phase,
            } => Some(v(
                base.x + amplitude.x * (time * frequency.x + phase.x).sin(),
                base.y + amplitude.y * (time * frequency.y + phase.y).sin(),
                base.z + amplitude.z * (time * frequency.z + phase.z).sin(),
            )),
            Palette::PerPrimitive => None,
        }
    }
}

/// The blob scene: spheres blended left to right.
#[derive(Clone, Debug)]
pub struct BlobField {
    pub primitives: Vec<PrimitiveSpec>,
    pub blend: f64,
    pub palette: Palette,
}

impl Field for BlobField {
    fn evaluate(&self, p: &V3, time: f64) -> FieldSample {
        let mut prims = self.primitives.iter().map(|s| s.at(time));
        let Some(first) = prims.next() else {
            return FieldSample {
                distance: f64::MAX,
                color: zero(),
            };
        };
        let mut d = first.sdf(p);
        let mut color = first.color;
        for prim in prims {
            let (blended, h) = smooth_union_weight(d, prim.sdf(p), self.blend);
            d = blended;
            color = mix3(&prim.color, &color, h);
        }
        FieldSample {
            distance: d,
            color: self.palette.animated(time).unwrap_or(color),
        }
    }
}
