use crate::error::ConfigError;
use crate::field::Field;
use crate::math::{abs, add, is_finite3, mul, normalize, sub, v, B1, B2, B3, V3};
use serde::{Deserialize, Serialize};

/// Normal returned when the field gradient vanishes.
pub const UP: V3 = B2;
pub const DEFAULT_NORMAL_EPSILON: f64 = 1e-3;
const MIN_GRADIENT: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: V3,
    pub direction: V3,
}

impl Ray {
    pub fn new(origin: V3, direction: V3) -> Self {
        Ray {
            origin,
            direction: normalize(&direction),
        }
    }

    pub fn at(&self, t: f64) -> V3 {
        add(&self.origin, &mul(t, &self.direction))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarchConfig {
    /// Hit threshold on the sampled distance.
    pub epsilon: f64,
    /// Damping applied to the sampled distance before stepping.
    pub step_fraction: f64,
    pub min_step: f64,
    pub max_distance: f64,
    pub max_steps: u32,
}

impl Default for MarchConfig {
    fn default() -> Self {
        MarchConfig {
            epsilon: 1e-3,
            step_fraction: 0.6,
            min_step: 5e-4,
            max_distance: 20.,
            max_steps: 120,
        }
    }
}

impl MarchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |x: f64| x.is_finite() && x > 0.;
        if !positive(self.epsilon) {
            return Err(ConfigError::InvalidMarch(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        if !positive(self.step_fraction) || self.step_fraction > 1. {
            return Err(ConfigError::InvalidMarch(format!(
                "step fraction must lie in (0, 1], got {}",
                self.step_fraction
            )));
        }
        if !positive(self.min_step) || self.min_step > self.epsilon {
            return Err(ConfigError::InvalidMarch(format!(
                "min step must lie in (0, epsilon = {}], got {}",
                self.epsilon, self.min_step
            )));
        }
        if !positive(self.max_distance) {
            return Err(ConfigError::InvalidMarch(format!(
                "max distance must be positive, got {}",
                self.max_distance
            )));
        }
        if self.max_steps == 0 {
            return Err(ConfigError::InvalidMarch("max steps must be non-zero".into()));
        }
        if self.step_fraction == 1. {
            log::warn!(
                "step fraction 1.0 marches the full distance and may overshoot blended surfaces"
            );
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HitResult {
    Hit { position: V3, distance: f64 },
    Miss,
}

impl HitResult {
    pub fn is_hit(&self) -> bool {
        matches!(self, HitResult::Hit { .. })
    }
}

/// Sphere-trace `ray` through `field`. Running out of steps is a miss.
pub fn march(field: &impl Field, ray: &Ray, time: f64, config: &MarchConfig) -> HitResult {
    let mut t = 0.;
    for _ in 0..config.max_steps {
        let position = ray.at(t);
        let d = field.distance(&position, time);
        if d < config.epsilon {
            return HitResult::Hit {
                position,
                distance: t,
            };
        }
        if t > config.max_distance {
            return HitResult::Miss;
        }
        t += (d * config.step_fraction).max(config.min_step);
    }
    HitResult::Miss
}

/// Central-difference gradient of `field` at `p`, normalized. Falls back to
/// [`UP`] when the gradient is too small or not finite.
pub fn normal(field: &impl Field, p: &V3, time: f64, epsilon: f64) -> V3 {
    let axis = |b: &V3| {
        let e = mul(epsilon, b);
        field.distance(&add(p, &e), time) - field.distance(&sub(p, &e), time)
    };
    let gradient = v(axis(&B1), axis(&B2), axis(&B3));
    let len = abs(&gradient);
    if !len.is_finite() || len < MIN_GRADIENT {
        return UP;
    }
    let n = mul(1. / len, &gradient);
    if is_finite3(&n) {
        n
    } else {
        UP
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::primitives::PrimitiveSpec;
    use crate::field::{BlobField, FieldSample, Palette, Pulse, Trajectory};
    use crate::math::{dot, O};
    use approx::assert_relative_eq;

    fn sphere(center: V3, radius: f64) -> BlobField {
        BlobField {
            primitives: vec![PrimitiveSpec {
                trajectory: Trajectory::fixed(center),
                radius: Pulse::fixed(radius),
                color: v(1., 1., 1.),
            }],
            blend: 0.6,
            palette: Palette::PerPrimitive,
        }
    }

    struct Constant;

    impl Field for Constant {
        fn evaluate(&self, _p: &V3, _time: f64) -> FieldSample {
            FieldSample {
                distance: 1.,
                color: O,
            }
        }
    }

    #[test]
    fn hits_sphere_from_outside() {
        let config = MarchConfig::default();
        let field = sphere(v(0.5, -0.25, -2.), 0.7);
        let origin = v(3., 1., 4.);
        let ray = Ray::new(origin, sub(&v(0.5, -0.25, -2.), &origin));
        let expected = abs(&sub(&v(0.5, -0.25, -2.), &origin)) - 0.7;
        match march(&field, &ray, 0., &config) {
            HitResult::Hit { distance, .. } => {
                let err = (distance - expected).abs();
                assert!(err <= config.epsilon, "{} vs {}", distance, expected)
            }
            HitResult::Miss => panic!("expected a hit"),
        }
    }

    #[test]
    fn misses_when_pointing_away() {
        let field = sphere(O, 1.);
        let ray = Ray::new(v(0., 0., 4.), v(0., 0.3, 1.));
        let result = march(&field, &ray, 0., &MarchConfig::default());
        assert!(!result.is_hit());
        assert_eq!(result, HitResult::Miss);
    }

    #[test]
    fn step_budget_exhaustion_is_a_miss() {
        let config = MarchConfig {
            max_steps: 3,
            ..Default::default()
        };
        let ray = Ray::new(v(0., 0., 40.), v(0., 0., -1.));
        assert_eq!(march(&sphere(O, 1.), &ray, 0., &config), HitResult::Miss);
    }

    #[test]
    fn grazing_rays_split_at_epsilon() {
        let field = sphere(O, 1.);
        let config = MarchConfig {
            max_steps: 2000,
            ..Default::default()
        };
        let graze = |height: f64| march(&field, &Ray::new(v(-4., height, 0.), B1), 0., &config);
        assert_eq!(graze(1.01), HitResult::Miss);
        for height in [0.9995, 1.0005] {
            match graze(height) {
                HitResult::Hit { distance, position } => {
                    assert!((3.9..4.1).contains(&distance), "{} at {}", distance, height);
                    assert!(field.distance(&position, 0.) < config.epsilon);
                }
                HitResult::Miss => panic!("ray at height {} missed", height),
            }
        }
    }

    #[test]
    fn starting_inside_hits_immediately() {
        let ray = Ray::new(O, v(1., 0., 0.));
        assert_eq!(
            march(&sphere(O, 1.), &ray, 0., &MarchConfig::default()),
            HitResult::Hit {
                position: O,
                distance: 0.
            }
        );
    }

    #[test]
    fn sphere_normal_is_radial() {
        let center = v(0.2, 0.1, -0.3);
        let field = sphere(center, 1.3);
        for dir in [v(1., 0., 0.), v(0., 0., -1.), v(1., 1., 1.), v(-2., 0.5, 0.3)] {
            let dir = normalize(&dir);
            let p = add(&center, &mul(1.3, &dir));
            let n = normal(&field, &p, 0., DEFAULT_NORMAL_EPSILON);
            assert_relative_eq!(abs(&n), 1., epsilon = 1e-12);
            assert!(dot(&n, &dir) > 1. - 1e-6);
        }
    }

    #[test]
    fn flat_field_falls_back_to_up() {
        assert_eq!(normal(&Constant, &O, 0., 1e-3), UP);
    }

    #[test]
    fn constant_field_never_hits() {
        let result = march(&Constant, &Ray::new(O, B3), 0., &MarchConfig::default());
        assert_eq!(result, HitResult::Miss);
    }

    #[test]
    fn validation_rejects_bad_settings() {
        assert!(MarchConfig::default().validate().is_ok());
        let bad = [
            MarchConfig {
                step_fraction: 1.5,
                ..Default::default()
            },
            MarchConfig {
                step_fraction: 0.,
                ..Default::default()
            },
            MarchConfig {
                min_step: 0.02,
                ..Default::default()
            },
            MarchConfig {
                epsilon: -1.,
                ..Default::default()
            },
            MarchConfig {
                max_steps: 0,
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{:?} accepted", config);
        }
    }
}
