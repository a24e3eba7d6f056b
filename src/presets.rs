use crate::background::{Background, Turbulence};
use crate::config::SceneConfig;
use crate::error::ConfigError;
use crate::field::primitives::PrimitiveSpec;
use crate::field::{Oscillator, Palette, Pulse, Trajectory};
use crate::marcher::MarchConfig;
use crate::math::{v, O};
use crate::render::camera::Camera;
use crate::shading::{Grade, Light, Shading, DEFAULT_GAMMA};
use std::f64::consts::FRAC_PI_2;

pub const NAMES: [&str; 3] = ["merging", "bloodstream", "single_sphere"];

pub fn by_name(name: &str) -> Result<SceneConfig, ConfigError> {
    match name {
        "merging" => Ok(merging()),
        "bloodstream" => Ok(bloodstream()),
        "single_sphere" => Ok(single_sphere()),
        _ => Err(ConfigError::UnknownPreset(name.to_string())),
    }
}

fn on_x(offset: f64, amplitude: f64, frequency: f64, phase: f64) -> Trajectory {
    Trajectory {
        x: Oscillator::sin(offset, amplitude, frequency, phase),
        ..Default::default()
    }
}

fn on_y(y: Oscillator) -> Trajectory {
    Trajectory {
        y,
        ..Default::default()
    }
}

/// Four spheres sliding along the x and y axes, merging through the center.
pub fn merging() -> SceneConfig {
    let white = v(1., 1., 1.);
    let sphere = |trajectory, radius| PrimitiveSpec {
        trajectory,
        radius: Pulse::fixed(radius),
        color: white,
    };
    SceneConfig {
        primitives: vec![
            sphere(on_x(-0.6, 0.6, 0.9, 0.), 0.6),
            sphere(on_x(0.6, 0.6, 1.1, 1.2), 0.6),
            sphere(on_y(Oscillator::cos(0., 0.6, 0.7, 0.)), 0.45),
            sphere(on_y(Oscillator::cos(0., -0.6, 0.9, 0.5)), 0.45),
        ],
        blend: 0.6,
        palette: Palette::Animated {
            base: v(0.3, 0.5, 0.9),
            amplitude: v(0.2, 0.3, 0.),
            frequency: v(1., 0.7, 0.),
            phase: v(0., FRAC_PI_2, 0.),
        },
        march: MarchConfig {
            epsilon: 1e-3,
            step_fraction: 0.6,
            min_step: 1e-3,
            max_distance: 20.,
            max_steps: 120,
        },
        normal_epsilon: 8e-4,
        shading: Shading::phong(),
        light: Light::Point {
            position: v(1.2, 1., 2.),
        },
        background: Background::Flat {
            color: v(0.02, 0.03, 0.06),
        },
        camera: Camera {
            position: v(0., 0., 3.),
            target: O,
            fov_degrees: 45.,
        },
        grade: None,
        gamma: 2.,
    }
}

/// Five pulsating red blobs orbiting over a drifting turbulent stream.
pub fn bloodstream() -> SceneConfig {
    let primitives = (0..5)
        .map(|i| {
            let fi = i as f64;
            let speed = 0.7 + 0.1 * fi;
            PrimitiveSpec {
                trajectory: Trajectory {
                    x: Oscillator::sin(0., 1.2, speed, fi),
                    y: Oscillator::cos(0., 1.2, 0.9 * speed, 1.3 * fi),
                    z: Oscillator::sin(0., 0.8, 0.8 * speed, 2. * fi),
                },
                radius: Pulse {
                    base: 0.55,
                    amplitude: 0.15,
                    frequency: 1.2,
                    phase: fi,
                },
                color: v(0.5, 0.05, 0.08),
            }
        })
        .collect();
    SceneConfig {
        primitives,
        blend: 0.6,
        palette: Palette::constant(v(0.5, 0.05, 0.08)),
        march: MarchConfig {
            epsilon: 2e-3,
            step_fraction: 0.8,
            min_step: 2e-3,
            max_distance: 10.,
            max_steps: 120,
        },
        normal_epsilon: 1e-3,
        shading: Shading::toon(),
        light: Light::Directional {
            direction: v(1.5, 1.2, 2.),
        },
        background: Background::Procedural(Turbulence::default()),
        camera: Camera::with_focal_length(v(0., 0., 4.), O, 1.2),
        grade: Some(Grade {
            tint: v(0.12, 0.01, 0.02),
            amount: 0.3,
        }),
        gamma: DEFAULT_GAMMA,
    }
}

/// One static unit sphere at the origin, seen from `(0, 0, 4)`.
pub fn single_sphere() -> SceneConfig {
    SceneConfig {
        primitives: vec![PrimitiveSpec {
            trajectory: Trajectory::fixed(O),
            radius: Pulse::fixed(1.),
            color: v(1., 1., 1.),
        }],
        blend: 0.6,
        palette: Palette::PerPrimitive,
        march: MarchConfig::default(),
        normal_epsilon: crate::marcher::DEFAULT_NORMAL_EPSILON,
        shading: Shading::phong(),
        light: Light::Directional {
            direction: v(1.5, 1.2, 2.),
        },
        background: Background::Flat {
            color: v(0.02, 0.03, 0.06),
        },
        camera: Camera {
            position: v(0., 0., 4.),
            target: O,
            fov_degrees: 45.,
        },
        grade: None,
        gamma: DEFAULT_GAMMA,
    }
}
