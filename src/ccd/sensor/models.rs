//! Sensor presets

use crate::ccd::sensor::geometry::{ReadoutMode, SensorGeometry};
use crate::ccd::units::{Length, LengthExt, Temperature, TemperatureExt};

/// The Teledyne e2v CCD230 used by the MSFC cameras.
pub fn teledyne_ccd230() -> SensorGeometry {
    SensorGeometry {
        manufacturer: "Teledyne".to_string(),
        family: "CCD230".to_string(),
        serial_number: None,
        num_pixel_x: Some(2152),
        num_pixel_y: Some(2048),
        num_blank: 50,
        num_overscan: 2,
        width_pixel: Length::from_micrometers(15.0),
        readout_mode: ReadoutMode::FrameTransfer,
        temperature: Temperature::from_celsius(-55.0),
        readout_noise: 4.0,
    }
}
