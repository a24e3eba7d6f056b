pub mod camera;

use crate::background::Background;
use crate::config::SceneConfig;
use crate::error::{ConfigError, RenderError};
use crate::field::{BlobField, Field};
use crate::marcher::{march, normal, HitResult, MarchConfig};
use crate::math::{mul, O, V2, V3};
use crate::shading::{gamma_encode, to_rgb8, Grade, Light, Shading, SurfaceSample};
use camera::{screen_uv, Camera};
use image::{ImageBuffer, Rgb, RgbImage};
use rayon::prelude::*;
use std::time::Instant;

/// A validated scene ready to be traced. Read-only while rendering.
#[derive(Clone, Debug)]
pub struct Scene {
    pub field: BlobField,
    pub march: MarchConfig,
    pub normal_epsilon: f64,
    pub shading: Shading,
    pub light: Light,
    pub background: Background,
    pub camera: Camera,
    pub grade: Option<Grade>,
    pub gamma: f64,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Result<Scene, ConfigError> {
        config.validate()?;
        log::debug!(
            "scene: {} primitives, blend {}, {:?}",
            config.primitives.len(),
            config.blend,
            config.march
        );
        Ok(Scene {
            field: BlobField {
                primitives: config.primitives,
                blend: config.blend,
                palette: config.palette,
            },
            march: config.march,
            normal_epsilon: config.normal_epsilon,
            shading: config.shading,
            light: config.light,
            background: config.background,
            camera: config.camera,
            grade: config.grade,
            gamma: config.gamma,
        })
    }

    /// Linear color seen through screen coordinate `uv`.
    pub fn trace(&self, uv: V2, time: f64) -> V3 {
        let ray = self.camera.ray(uv);
        let color = match march(&self.field, &ray, time, &self.march) {
            HitResult::Hit { position, .. } => {
                let sample = SurfaceSample {
                    position,
                    normal: normal(&self.field, &position, time, self.normal_epsilon),
                    color: self.field.evaluate(&position, time).color,
                    view: -ray.direction,
                };
                let light = self.light.direction_from(&position);
                self.shading.shade(&sample, &light, time)
            }
            HitResult::Miss => self.background.background(uv, time),
        };
        match &self.grade {
            Some(grade) => grade.apply(&color),
            None => color,
        }
    }

    /// Display color of pixel `(px, py)`, rows counted from the top.
    /// `antialias` is the number of sub-samples per axis.
    pub fn pixel(
        &self,
        px: u32,
        py: u32,
        width: u32,
        height: u32,
        time: f64,
        antialias: u32,
    ) -> [u8; 3] {
        let n = antialias.max(1);
        let sub = 1. / n as f64;
        let mut sum = O;
        for jx in 0..n {
            for jy in 0..n {
                let uv = screen_uv(
                    px as f64 + (jx as f64 + 0.5) * sub,
                    py as f64 + (jy as f64 + 0.5) * sub,
                    width,
                    height,
                );
                sum = sum + self.trace(uv, time);
            }
        }
        let linear = mul(1. / (n * n) as f64, &sum);
        to_rgb8(&gamma_encode(&linear, self.gamma))
    }
}

/// Render one frame. Every pixel is traced independently on the rayon pool.
pub fn render_frame(
    scene: &Scene,
    width: u32,
    height: u32,
    time: f64,
    antialias: u32,
) -> Result<RgbImage, RenderError> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidResolution { width, height });
    }
    let start = Instant::now();
    let w = width as usize;
    let pixels: Vec<u8> = (0..w * height as usize)
        .into_par_iter()
        .map(move |i| ((i % w) as u32, (i / w) as u32))
        .flat_map_iter(|(x, y)| scene.pixel(x, y, width, height, time, antialias))
        .collect();
    log::info!(
        "frame t={:.3}s {}x{} took {} s",
        time,
        width,
        height,
        start.elapsed().as_secs_f32()
    );
    ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, pixels)
        .ok_or(RenderError::InvalidResolution { width, height })
}
