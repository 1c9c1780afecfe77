//! Rendering module for surfacelab.
//!
//! This module builds gradient buffers, keys backgrounds, and composites
//! rule fills over a source frame.

pub mod background;
pub mod compositor;
pub mod gradient;
mod png;
mod session;

pub use background::BackgroundKeyer;
pub use compositor::{prepare_rules, render, PreparedRule};
pub use gradient::{rasterize, ColorStops, GradientCache, GradientKey};
pub use png::{is_image_path, load_png, write_png, IMAGE_EXTENSIONS};
pub use session::Session;
