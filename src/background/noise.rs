use crate::math::{fract, mix, v2, V2};

pub const DEFAULT_OCTAVES: u32 = 5;

/// Deterministic pseudo-random value in `[0, 1)` for a lattice point.
pub fn hash(p: V2) -> f64 {
    fract((p.x * 127.1 + p.y * 311.7).sin() * 43758.5453)
}

/// Bilinear value noise with a smoothstep fade between lattice corners.
pub fn value_noise(p: V2) -> f64 {
    let i = p.floor();
    let f = p - i;
    let ux = f.x * f.x * (3. - 2. * f.x);
    let uy = f.y * f.y * (3. - 2. * f.y);
    mix(
        mix(hash(i), hash(i + v2(1., 0.)), ux),
        mix(hash(i + v2(0., 1.)), hash(i + v2(1., 1.)), ux),
        uy,
    )
}

/// Fractal sum: each octave doubles frequency and halves amplitude.
pub fn fbm(p: V2, octaves: u32) -> f64 {
    let mut p = p;
    let mut value = 0.;
    let mut amplitude = 0.5;
    for _ in 0..octaves {
        value += amplitude * value_noise(p);
        p = 2. * p;
        amplitude *= 0.5;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_unit_interval() {
        for i in -50..50 {
            for j in -50..50 {
                let h = hash(v2(i as f64, j as f64));
                assert!((0. ..1.).contains(&h));
            }
        }
    }

    #[test]
    fn noise_matches_hash_on_lattice() {
        for (x, y) in [(0., 0.), (3., -2.), (-7., 11.)] {
            assert_eq!(value_noise(v2(x, y)), hash(v2(x, y)));
        }
    }

    #[test]
    fn fbm_stays_below_amplitude_sum() {
        for i in 0..500 {
            let p = v2(i as f64 * 0.173, i as f64 * -0.091);
            let n = fbm(p, DEFAULT_OCTAVES);
            assert!(n >= 0. && n < 1. - 0.5f64.powi(DEFAULT_OCTAVES as i32) + 1e-12);
        }
        assert_eq!(fbm(v2(0.3, 0.4), 0), 0.);
    }
}
