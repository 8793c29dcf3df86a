//! Calibration pipeline module
//!
//! Orchestrates decoding, calibration and encoding of raw frame batches.

mod calibrate;
pub mod config;

pub use calibrate::{CalibrationPipeline, OUTPUT_SUFFIX, output_path};
pub use config::{PipelineConfig, PipelineConfigBuilder};
