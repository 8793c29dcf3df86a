//! Segmented CCD image model
//!
//! This module provides the sensor description, calibration transfer
//! functions, the whole-sensor and per-tap image types, and a pipeline for
//! calibrating batches of raw frames.

pub mod calibration;
pub mod common;
pub mod frame;
pub mod io;
pub mod pipeline;
pub mod sensor;
pub mod taps;
pub mod units;

pub use common::{CcdError, Result};

pub use calibration::{
    DarkCurrentModel,
    adc_temperature_1,
    adc_temperature_234,
    dark_current,
    exposure_time,
    fpga_temperature,
    fpga_voltage,
};

pub use sensor::{Camera, ReadoutMode, SensorGeometry, SensorGeometryBuilder, teledyne_ccd230};

pub use frame::{
    Field,
    FrameHeader,
    HeaderRecord,
    ImageAxes,
    ImageFrame,
    SensorFrame,
    TapAxes,
    TapFrame,
    Telemetry,
};

pub use taps::{BiasRegion, SplitConfig, SplitConfigBuilder, recombine, split};

pub use io::{
    FrameReader,
    FrameWriter,
    RawFrame,
    TiffCompression,
    TiffFrameReader,
    TiffFrameWriter,
};

pub use pipeline::{CalibrationPipeline, PipelineConfig, PipelineConfigBuilder};
