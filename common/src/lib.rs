#[macro_use]
pub mod macros;
pub mod bool_ext;
pub mod file_format;
pub mod float_ext;
pub mod log_setup;
pub mod serde;

pub use bool_ext::BoolExt;
pub use file_format::{FileExtensionError, FileFormat};
pub use float_ext::FloatExt;

pub const EPSILON: f64 = 1e-6;
