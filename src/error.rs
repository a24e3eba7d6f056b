use thiserror::Error;

/// Rejected scene configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Scene has no primitives")]
    NoPrimitives,

    #[error("Scene has {count} primitives, at most {max} are supported")]
    TooManyPrimitives { count: usize, max: usize },

    #[error("Primitive {index}: radius base {base} with pulsation {amplitude} can reach zero")]
    InvalidRadius {
        index: usize,
        base: f64,
        amplitude: f64,
    },

    #[error("Blend radius must be positive and finite, got {0}")]
    InvalidBlend(f64),

    #[error("Invalid march settings: {0}")]
    InvalidMarch(String),

    #[error("Normal epsilon must be positive and finite, got {0}")]
    InvalidNormalEpsilon(f64),

    #[error("Gamma must be positive and finite, got {0}")]
    InvalidGamma(f64),

    #[error("Invalid camera: {0}")]
    InvalidCamera(String),

    #[error("Invalid shading: {0}")]
    InvalidShading(String),

    #[error("Invalid background: {0}")]
    InvalidBackground(String),

    #[error("Invalid light: {0}")]
    InvalidLight(String),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}

/// Errors surfaced by the frame renderer and the command line front end.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Frame rate must be positive, got {0}")]
    InvalidFrameRate(f64),
}
