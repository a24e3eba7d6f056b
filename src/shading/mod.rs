//! Local illumination for march hits and the display post-process.
//!
//! All shading happens in linear space. [`gamma_encode`] is the only step
//! that produces display values.

use crate::error::ConfigError;
use crate::math::{
    abs, clamp3, dot, is_finite3, mix3, mul, normalize, powf3, reflect, smoothstep, sub, V3,
};
use serde::{Deserialize, Serialize};

/// Everything the shader needs to know about a hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSample {
    pub position: V3,
    pub normal: V3,
    pub color: V3,
    /// Unit direction from the hit back towards the eye.
    pub view: V3,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Light {
    Directional { direction: V3 },
    Point { position: V3 },
}

impl Light {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Light::Directional { direction } if !is_finite3(direction) || abs(direction) < 1e-9 => {
                Err(ConfigError::InvalidLight(format!(
                    "direction must be finite and non-zero, got {:?}",
                    direction
                )))
            }
            Light::Point { position } if !is_finite3(position) => Err(ConfigError::InvalidLight(
                format!("position must be finite, got {:?}", position),
            )),
            _ => Ok(()),
        }
    }

    /// Unit direction from `p` towards the light.
    pub fn direction_from(&self, p: &V3) -> V3 {
        match self {
            Light::Directional { direction } => normalize(direction),
            Light::Point { position } => normalize(&sub(position, p)),
        }
    }
}

/// Brightness modulation `(1 - depth) + depth * (0.5 + 0.5 sin(time * rate))`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pulsation {
    pub rate: f64,
    pub depth: f64,
}

impl Default for Pulsation {
    fn default() -> Self {
        Pulsation { rate: 4., depth: 0.3 }
    }
}

impl Pulsation {
    pub fn factor(&self, time: f64) -> f64 {
        (1. - self.depth) + self.depth * (0.5 + 0.5 * (time * self.rate).sin())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shading {
    Phong {
        ambient: f64,
        diffuse: f64,
        specular: f64,
        shininess: f64,
    },
    Toon {
        bands: u32,
        /// Upper edge of the smoothstep applied to `n·l` before banding.
        softness: f64,
        /// Intensity of the darkest band.
        floor: f64,
        #[serde(default)]
        pulse: Option<Pulsation>,
    },
}

impl Shading {
    pub fn phong() -> Self {
        Shading::Phong {
            ambient: 0.2,
            diffuse: 1.,
            specular: 0.5,
            shininess: 32.,
        }
    }

    pub fn toon() -> Self {
        Shading::Toon {
            bands: 4,
            softness: 0.6,
            floor: 0.4,
            pulse: Some(Pulsation::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Shading::Phong { shininess, .. } if !(shininess.is_finite() && shininess > 0.) => {
                Err(ConfigError::InvalidShading(format!(
                    "shininess must be positive, got {}",
                    shininess
                )))
            }
            Shading::Toon { bands: 0, .. } => {
                Err(ConfigError::InvalidShading("toon shading needs at least one band".into()))
            }
            Shading::Toon { softness, .. } if !(softness.is_finite() && softness > 0.) => {
                Err(ConfigError::InvalidShading(format!(
                    "toon softness must be positive, got {}",
                    softness
                )))
            }
            _ => Ok(()),
        }
    }

    /// Linear color of a lit surface point.
    pub fn shade(&self, sample: &SurfaceSample, light: &V3, time: f64) -> V3 {
        let n = &sample.normal;
        match *self {
            Shading::Phong {
                ambient,
                diffuse,
                specular,
                shininess,
            } => {
                let diff = dot(n, light).max(0.);
                let r = reflect(&-*light, n);
                let spec = dot(&sample.view, &r).max(0.).powf(shininess);
                mul(ambient + diffuse * diff + specular * spec, &sample.color)
            }
            Shading::Toon {
                bands,
                softness,
                floor,
                pulse,
            } => {
                let bands = bands as f64;
                let s = smoothstep(0., softness, dot(n, light));
                let s = (s * bands).floor() / bands;
                let c = mul(floor + (1. - floor) * s, &sample.color);
                match pulse {
                    Some(p) => mul(p.factor(time), &c),
                    None => c,
                }
            }
        }
    }
}

/// Final tint blended over every pixel before encoding.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub tint: V3,
    pub amount: f64,
}

impl Grade {
    pub fn apply(&self, color: &V3) -> V3 {
        mix3(color, &self.tint, self.amount)
    }
}

pub const DEFAULT_GAMMA: f64 = 2.2;

/// Linear to display. Every channel of the result lies in `[0, 1]`.
pub fn gamma_encode(color: &V3, gamma: f64) -> V3 {
    let c = clamp3(color, 0., f64::MAX);
    clamp3(&powf3(&c, 1. / gamma), 0., 1.)
}

pub fn to_rgb8(color: &V3) -> [u8; 3] {
    let q = |x: f64| (x.clamp(0., 1.) * 255. + 0.5) as u8;
    [q(color.x), q(color.y), q(color.z)]
}
