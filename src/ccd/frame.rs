//! Image data model
//!
//! Whole-sensor images, their tap decomposition, and the calibrated metadata
//! shared by both.

pub mod axes;
pub mod coords;
pub mod field;
pub mod header;
pub mod image;
pub mod sensor_frame;
pub mod tap_frame;
pub mod telemetry;

pub use axes::{FrameMeta, ImageAxes, TapAxes, batch_indices};
pub use coords::PixelCoords;
pub use field::Field;
pub use header::{FrameHeader, HeaderRecord};
pub use image::ImageFrame;
pub use sensor_frame::SensorFrame;
pub use tap_frame::TapFrame;
pub use telemetry::{Telemetry, keys};
