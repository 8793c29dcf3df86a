//! Static description of a tapped CCD sensor

use crate::ccd::calibration::dark_current::{REFERENCE_TEMPERATURE_K, dark_current};
use crate::ccd::common::error::{CcdError, Result};
use crate::ccd::units::{Length, LengthExt, Temperature, TemperatureExt};

/// Number of taps along the long (horizontal) axis of the sensor.
pub const NUM_TAP_X: usize = 2;

/// Number of taps along the short (vertical) axis of the sensor.
pub const NUM_TAP_Y: usize = 2;

/// How charge is moved off the light-sensitive area before readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadoutMode {
    /// The whole sensor integrates light and is read out directly.
    FullFrame,
    /// Half of the sensor is masked and used as a storage region.
    FrameTransfer,
}

/// Geometry and nominal operating point of one sensor model.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorGeometry {
    pub manufacturer: String,
    pub family: String,
    pub serial_number: Option<String>,
    /// Total pixel extent along the horizontal axis, if known.
    ///
    /// Raw rasters are checked against it on ingest. Frames derived from
    /// them (cropped or split) keep the geometry but not its extent.
    pub num_pixel_x: Option<usize>,
    /// Total pixel extent along the vertical axis, if known
    pub num_pixel_y: Option<usize>,
    /// Blank columns at the start of each tap row, farthest from the frame center
    pub num_blank: usize,
    /// Overscan columns at the end of each tap row, next to the frame center
    pub num_overscan: usize,
    /// Physical pixel pitch
    pub width_pixel: Length,
    pub readout_mode: ReadoutMode,
    /// Nominal operating temperature
    pub temperature: Temperature,
    /// Readout noise in electrons
    pub readout_noise: f64,
}

impl SensorGeometry {
    pub const NUM_TAP_X: usize = NUM_TAP_X;
    pub const NUM_TAP_Y: usize = NUM_TAP_Y;

    pub fn builder() -> SensorGeometryBuilder {
        SensorGeometryBuilder::default()
    }

    /// Number of light-sensitive pixels as `(x, y)`, if the total extent is known.
    pub fn num_pixel_active(&self) -> Option<(usize, usize)> {
        let x = self.num_pixel_x?;
        let y = self.num_pixel_y?;
        let inactive = NUM_TAP_X * (self.num_blank + self.num_overscan);
        let x = x.saturating_sub(inactive);
        let y = match self.readout_mode {
            ReadoutMode::FullFrame => y,
            ReadoutMode::FrameTransfer => y / 2,
        };
        Some((x, y))
    }

    /// Expected dark current at the nominal operating temperature (e⁻/pixel/s).
    pub fn dark_current(&self) -> f64 {
        dark_current(self.temperature)
    }
}

#[derive(Default)]
pub struct SensorGeometryBuilder {
    manufacturer: Option<String>,
    family: Option<String>,
    serial_number: Option<String>,
    num_pixel_x: Option<usize>,
    num_pixel_y: Option<usize>,
    num_blank: Option<usize>,
    num_overscan: Option<usize>,
    width_pixel: Option<Length>,
    readout_mode: Option<ReadoutMode>,
    temperature: Option<Temperature>,
    readout_noise: Option<f64>,
}

impl SensorGeometryBuilder {
    pub fn manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }

    pub fn num_pixel(mut self, x: usize, y: usize) -> Self {
        self.num_pixel_x = Some(x);
        self.num_pixel_y = Some(y);
        self
    }

    pub fn num_blank(mut self, num: usize) -> Self {
        self.num_blank = Some(num);
        self
    }

    pub fn num_overscan(mut self, num: usize) -> Self {
        self.num_overscan = Some(num);
        self
    }

    pub fn width_pixel(mut self, width: Length) -> Self {
        self.width_pixel = Some(width);
        self
    }

    pub fn readout_mode(mut self, mode: ReadoutMode) -> Self {
        self.readout_mode = Some(mode);
        self
    }

    pub fn temperature(mut self, temperature: Temperature) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn readout_noise(mut self, electrons: f64) -> Self {
        self.readout_noise = Some(electrons);
        self
    }

    pub fn build(self) -> Result<SensorGeometry> {
        let num_blank = self.num_blank.unwrap_or(1);
        let num_overscan = self.num_overscan.unwrap_or(1);

        if num_blank == 0 {
            return Err(CcdError::InvalidGeometry("num_blank must be positive".into()));
        }
        if num_overscan == 0 {
            return Err(CcdError::InvalidGeometry("num_overscan must be positive".into()));
        }

        let readout_noise = self.readout_noise.unwrap_or(1.0);
        if !(readout_noise > 0.0) {
            return Err(CcdError::InvalidGeometry(format!(
                "readout noise must be positive, got {readout_noise}"
            )));
        }

        let width_pixel = self.width_pixel.unwrap_or(Length::from_micrometers(15.0));
        if !(width_pixel.as_micrometers() > 0.0) {
            return Err(CcdError::InvalidGeometry("pixel width must be positive".into()));
        }

        Ok(SensorGeometry {
            manufacturer: self.manufacturer.unwrap_or_default(),
            family: self.family.unwrap_or_default(),
            serial_number: self.serial_number,
            num_pixel_x: self.num_pixel_x,
            num_pixel_y: self.num_pixel_y,
            num_blank,
            num_overscan,
            width_pixel,
            readout_mode: self.readout_mode.unwrap_or(ReadoutMode::FullFrame),
            temperature: self
                .temperature
                .unwrap_or(Temperature::from_kelvin(REFERENCE_TEMPERATURE_K)),
            readout_noise,
        })
    }
}
