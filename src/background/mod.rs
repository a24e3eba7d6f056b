pub mod noise;

use crate::error::ConfigError;
use crate::math::{fract, mix3, modulo, mul, smoothstep, v, v2, V2, V3, O};
use noise::{fbm, DEFAULT_OCTAVES};
use serde::{Deserialize, Serialize};

/// Color shown where no ray hits the scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Background {
    Flat { color: V3 },
    Procedural(Turbulence),
}

impl Background {
    pub fn background(&self, uv: V2, time: f64) -> V3 {
        match self {
            Background::Flat { color } => *color,
            Background::Procedural(t) => t.color(uv, time),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Background::Flat { .. } => Ok(()),
            Background::Procedural(t) => t.validate(),
        }
    }
}

/// Drifting fbm turbulence over a pulsing gradient, with moving cells on top.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Turbulence {
    pub octaves: u32,
    pub scale: f64,
    /// Horizontal scroll speed of the pattern.
    pub drift: f64,
    /// Vertical scroll speed inside the noise domain.
    pub flow: f64,
    pub pulse_rate: f64,
    pub dark: V3,
    pub mid: V3,
    pub light: V3,
    pub glow_low: f64,
    pub glow_high: f64,
    pub glow_mix: f64,
    pub cells: Cells,
}

impl Default for Turbulence {
    fn default() -> Self {
        Turbulence {
            octaves: DEFAULT_OCTAVES,
            scale: 2.5,
            drift: 0.3,
            flow: 0.3,
            pulse_rate: 3.5,
            dark: v(0.05, 0., 0.01),
            mid: v(0.2, 0.02, 0.04),
            light: v(0.65, 0.1, 0.12),
            glow_low: 0.5,
            glow_high: 0.7,
            glow_mix: 0.4,
            cells: Cells::default(),
        }
    }
}

impl Turbulence {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.octaves == 0 {
            return Err(ConfigError::InvalidBackground("noise needs at least one octave".into()));
        }
        let (lo, hi) = (self.glow_low, self.glow_high);
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(ConfigError::InvalidBackground(format!(
                "glow band must satisfy low < high, got [{}, {}]",
                lo, hi
            )));
        }
        if !(self.cells.radius.is_finite() && self.cells.radius > 0.) {
            return Err(ConfigError::InvalidBackground(format!(
                "cell radius must be positive, got {}",
                self.cells.radius
            )));
        }
        Ok(())
    }

    pub fn color(&self, uv: V2, time: f64) -> V3 {
        let p = v2(uv.x * 2. + time * self.drift, uv.y * 2.);
        let n = fbm(self.scale * p + v2(0., time * self.flow), self.octaves);
        let pulse = 0.65 + 0.35 * (time * self.pulse_rate).sin();
        let base = mix3(&self.dark, &self.mid, pulse);
        let glow = mix3(&base, &self.light, smoothstep(self.glow_low, self.glow_high, n));
        let cells = self.cells.color(uv, time, self.octaves);
        mix3(&base, &glow, self.glow_mix) + mul(self.cells.gain, &cells)
    }
}

/// Overrides the cell color for every index divisible by `modulus`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellClass {
    pub modulus: u32,
    pub color: V3,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cells {
    pub count: u32,
    /// Distance at which a cell's influence falls to zero.
    pub radius: f64,
    pub speed: f64,
    pub gain: f64,
    pub warm: V3,
    pub cool: V3,
    /// Later classes win when several match.
    pub classes: Vec<CellClass>,
}

impl Default for Cells {
    fn default() -> Self {
        Cells {
            count: 12,
            radius: 0.15,
            speed: 0.25,
            gain: 0.9,
            warm: v(0.9, 0.15, 0.18),
            cool: v(0.4, 0.05, 0.08),
            classes: vec![
                CellClass {
                    modulus: 3,
                    color: v(0.9, 0.9, 0.95),
                },
                CellClass {
                    modulus: 5,
                    color: v(0.8, 0.4, 0.3),
                },
            ],
        }
    }
}

impl Cells {
    /// Screen position of cell `i` at `time`, roughly inside `[-1, 1]²`.
    pub fn position(&self, i: u32, time: f64) -> V2 {
        let fi = i as f64;
        let x = fract((fi * 21.7 + time * 0.25).sin() * 43758.5) * 2. - 1.;
        let y = fract((fi * 17.3 + time * 0.28).cos() * 27345.2) * 2. - 1.;
        v2(x - (modulo(time * self.speed + fi * 0.1, 2.) - 1.), y)
    }

    fn class_color(&self, i: u32, uv: V2, time: f64, octaves: u32) -> V3 {
        self.classes
            .iter()
            .rev()
            .find(|c| c.modulus != 0 && i % c.modulus == 0)
            .map(|c| c.color)
            .unwrap_or_else(|| {
                mix3(&self.warm, &self.cool, fbm(3. * uv + v2(time, time), octaves))
            })
    }

    pub fn color(&self, uv: V2, time: f64, octaves: u32) -> V3 {
        (0..self.count).fold(O, |acc, i| {
            let d = (uv - self.position(i, time)).length();
            let intensity = smoothstep(self.radius, 0., d);
            if intensity == 0. {
                return acc;
            }
            acc + mul(intensity * 0.5, &self.class_color(i, uv, time, octaves))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_is_constant() {
        let bg = Background::Flat {
            color: v(0.02, 0.03, 0.06),
        };
        assert_eq!(bg.background(v2(0.3, -0.2), 1.), v(0.02, 0.03, 0.06));
        assert_eq!(bg.background(v2(-0.9, 0.4), 99.), v(0.02, 0.03, 0.06));
    }

    #[test]
    fn procedural_is_bit_reproducible() {
        let bg = Background::Procedural(Turbulence::default());
        for i in 0..200 {
            let uv = v2(i as f64 * 0.013 - 1., 0.5 - i as f64 * 0.007);
            let t = i as f64 * 0.21;
            let a = bg.background(uv, t);
            let b = bg.background(uv, t);
            assert_eq!(a.x.to_bits(), b.x.to_bits());
            assert_eq!(a.y.to_bits(), b.y.to_bits());
            assert_eq!(a.z.to_bits(), b.z.to_bits());
        }
    }

    #[test]
    fn procedural_varies_over_screen() {
        let bg = Background::Procedural(Turbulence::default());
        let a = bg.background(v2(-0.5, 0.2), 2.);
        let b = bg.background(v2(0.4, -0.3), 2.);
        assert_ne!(a, b);
    }

    #[test]
    fn cell_center_takes_class_color() {
        let cells = Cells::default();
        let t = 1.3;
        // 15 is divisible by both 3 and 5; the later class wins.
        let at = cells.position(15, t);
        assert_eq!(cells.class_color(15, at, t, DEFAULT_OCTAVES), v(0.8, 0.4, 0.3));
        assert_eq!(cells.class_color(6, at, t, DEFAULT_OCTAVES), v(0.9, 0.9, 0.95));
        let lone = Cells {
            count: 1,
            classes: vec![CellClass {
                modulus: 1,
                color: v(1., 1., 1.),
            }],
            ..Cells::default()
        };
        let c = lone.color(lone.position(0, t), t, DEFAULT_OCTAVES);
        assert_eq!(c, v(0.5, 0.5, 0.5));
    }

    #[test]
    fn degenerate_tunables_are_rejected() {
        assert!(Background::Procedural(Turbulence::default()).validate().is_ok());
        let pinpoint = Turbulence {
            cells: Cells {
                radius: 0.,
                ..Cells::default()
            },
            ..Turbulence::default()
        };
        assert!(matches!(pinpoint.validate(), Err(ConfigError::InvalidBackground(_))));
        let flat_glow = Turbulence {
            glow_low: 0.6,
            glow_high: 0.6,
            ..Turbulence::default()
        };
        assert!(flat_glow.validate().is_err());
        let silent = Turbulence {
            octaves: 0,
            ..Turbulence::default()
        };
        assert!(silent.validate().is_err());
    }

    #[test]
    fn cells_have_no_influence_far_away() {
        let cells = Cells::default();
        assert_eq!(cells.color(v2(50., 50.), 3., DEFAULT_OCTAVES), O);
    }
}
