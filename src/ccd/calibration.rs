//! Calibration module
//!
//! Conversion of raw telemetry counts to physical quantities and the
//! thermal dark current model.

pub mod dark_current;
pub mod transfer;

pub use dark_current::{DarkCurrentModel, dark_current};
pub use transfer::{
    adc_temperature_1,
    adc_temperature_234,
    exposure_time,
    fpga_temperature,
    fpga_voltage,
};
