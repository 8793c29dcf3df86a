//! Sensor and camera models
//!
//! This module describes the tapped CCD geometry and the camera built around it.

pub mod camera;
pub mod geometry;
pub mod models;

pub use camera::Camera;
pub use geometry::{NUM_TAP_X, NUM_TAP_Y, ReadoutMode, SensorGeometry, SensorGeometryBuilder};
pub use models::teledyne_ccd230;
