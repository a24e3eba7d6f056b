//! Serializable scene description.
//!
//! A [`SceneConfig`] carries every tunable of a scene as plain data. It is
//! checked once by [`SceneConfig::validate`] and then turned into a
//! [`crate::render::Scene`].

use crate::background::Background;
use crate::error::ConfigError;
use crate::field::primitives::PrimitiveSpec;
use crate::field::{Palette, MAX_PRIMITIVES};
use crate::marcher::{MarchConfig, DEFAULT_NORMAL_EPSILON};
use crate::render::camera::Camera;
use crate::shading::{Grade, Light, Shading, DEFAULT_GAMMA};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Blend radii below this behave like a hard `min` and can amplify noise.
const TINY_BLEND: f64 = 1e-4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub primitives: Vec<PrimitiveSpec>,
    /// Smooth union radius `k`.
    pub blend: f64,
    pub palette: Palette,
    #[serde(default)]
    pub march: MarchConfig,
    #[serde(default = "default_normal_epsilon")]
    pub normal_epsilon: f64,
    pub shading: Shading,
    pub light: Light,
    pub background: Background,
    pub camera: Camera,
    #[serde(default)]
    pub grade: Option<Grade>,
    #[serde(default = "default_gamma")]
    pub gamma: f64,
}

fn default_normal_epsilon() -> f64 {
    DEFAULT_NORMAL_EPSILON
}

fn default_gamma() -> f64 {
    DEFAULT_GAMMA
}

impl SceneConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::debug!("loading scene config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.primitives.len() {
            0 => return Err(ConfigError::NoPrimitives),
            count if count > MAX_PRIMITIVES => {
                return Err(ConfigError::TooManyPrimitives {
                    count,
                    max: MAX_PRIMITIVES,
                })
            }
            _ => {}
        }
        for (index, p) in self.primitives.iter().enumerate() {
            if !p.radius.is_valid() {
                return Err(ConfigError::InvalidRadius {
                    index,
                    base: p.radius.base,
                    amplitude: p.radius.amplitude,
                });
            }
        }
        if !(self.blend.is_finite() && self.blend > 0.) {
            return Err(ConfigError::InvalidBlend(self.blend));
        }
        if self.blend < TINY_BLEND {
            log::warn!(
                "blend radius {} is effectively a hard union; seams may show noise",
                self.blend
            );
        }
        self.march.validate()?;
        if !(self.normal_epsilon.is_finite() && self.normal_epsilon > 0.) {
            return Err(ConfigError::InvalidNormalEpsilon(self.normal_epsilon));
        }
        self.shading.validate()?;
        self.light.validate()?;
        self.background.validate()?;
        self.camera.validate()?;
        if !(self.gamma.is_finite() && self.gamma > 0.) {
            return Err(ConfigError::InvalidGamma(self.gamma));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Pulse;
    use crate::math::O;
    use crate::presets;

    #[test]
    fn presets_are_valid() {
        for name in presets::NAMES {
            let config = presets::by_name(name).unwrap();
            config.validate().unwrap();
        }
    }

    #[test]
    fn json_round_trip_preserves_preset() {
        let config = presets::bloodstream();
        let json = config.to_json_string().unwrap();
        let back = SceneConfig::from_json_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn defaults_fill_optional_fields() {
        let mut value = serde_json::to_value(presets::single_sphere()).unwrap();
        let obj = value.as_object_mut().unwrap();
        obj.remove("march");
        obj.remove("gamma");
        obj.remove("grade");
        obj.remove("normal_epsilon");
        let config = SceneConfig::from_json_str(&value.to_string()).unwrap();
        assert_eq!(config.march, MarchConfig::default());
        assert_eq!(config.gamma, DEFAULT_GAMMA);
        assert_eq!(config.grade, None);
    }

    #[test]
    fn rejects_bad_scenes() {
        let mut empty = presets::merging();
        empty.primitives.clear();
        assert!(matches!(empty.validate(), Err(ConfigError::NoPrimitives)));

        let mut crowded = presets::merging();
        let first = crowded.primitives[0];
        crowded.primitives.resize(MAX_PRIMITIVES + 1, first);
        assert!(matches!(
            crowded.validate(),
            Err(ConfigError::TooManyPrimitives { count: 13, .. })
        ));

        let mut collapsing = presets::merging();
        collapsing.primitives[2].radius = Pulse {
            base: 0.3,
            amplitude: 0.3,
            frequency: 1.,
            phase: 0.,
        };
        assert!(matches!(
            collapsing.validate(),
            Err(ConfigError::InvalidRadius { index: 2, .. })
        ));

        let mut hard = presets::merging();
        hard.blend = 0.;
        assert!(matches!(hard.validate(), Err(ConfigError::InvalidBlend(_))));

        let mut dark = presets::merging();
        dark.gamma = -1.;
        assert!(matches!(dark.validate(), Err(ConfigError::InvalidGamma(_))));

        let mut unlit = presets::bloodstream();
        unlit.light = Light::Directional { direction: O };
        assert!(matches!(unlit.validate(), Err(ConfigError::InvalidLight(_))));

        let mut pinpoint = presets::bloodstream();
        match &mut pinpoint.background {
            Background::Procedural(t) => t.cells.radius = 0.,
            Background::Flat { .. } => panic!("bloodstream has a procedural background"),
        }
        assert!(matches!(
            pinpoint.validate(),
            Err(ConfigError::InvalidBackground(_))
        ));

        let mut banded = presets::bloodstream();
        match &mut banded.background {
            Background::Procedural(t) => t.glow_high = t.glow_low,
            Background::Flat { .. } => panic!("bloodstream has a procedural background"),
        }
        assert!(matches!(
            banded.validate(),
            Err(ConfigError::InvalidBackground(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            SceneConfig::from_json_str("{ \"blend\": "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            SceneConfig::from_json_file("/nonexistent/scene.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
