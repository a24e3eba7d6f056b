pub mod background;
pub mod config;
pub mod error;
pub mod field;
pub mod marcher;
pub mod math;
pub mod presets;
pub mod render;
pub mod shading;

pub use config::SceneConfig;
pub use error::{ConfigError, RenderError};
pub use field::Field;
pub use render::{render_frame, Scene};
