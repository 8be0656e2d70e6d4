//! Service adapters: headless collaborators and the settings loader.

pub mod headless_runtime;
pub mod headless_surface;
pub mod settings;

pub use headless_runtime::HeadlessRuntime;
pub use headless_surface::{HeadlessSurface, SurfaceOp};
pub use settings::{load_settings, write_default_settings};
