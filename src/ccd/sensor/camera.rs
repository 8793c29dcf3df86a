//! Camera model: a sensor plus the electronics used to read it out.

use std::sync::Arc;

use crate::ccd::sensor::geometry::SensorGeometry;
use crate::ccd::sensor::models::teledyne_ccd230;
use crate::ccd::units::{Duration, TimeExt};

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub sensor: Arc<SensorGeometry>,
    /// Conversion factor between electrons and ADC counts (e⁻/DN), if calibrated
    pub gain: Option<f64>,
    /// Resolution of the analog-to-digital converter
    pub bits_adc: u32,
    pub timedelta_exposure: Duration,
    pub timedelta_exposure_min: Duration,
    pub timedelta_exposure_max: Duration,
    /// Smallest supported change in exposure length
    pub timedelta_exposure_step: Duration,
    /// Time needed to shift the exposed pixels into the storage region
    pub timedelta_transfer: Duration,
    pub timedelta_readout: Duration,
}

impl Default for Camera {
    fn default() -> Self {
        Self::with_sensor(Arc::new(teledyne_ccd230()))
    }
}

impl Camera {
    pub fn with_sensor(sensor: Arc<SensorGeometry>) -> Self {
        Self {
            sensor,
            gain: None,
            bits_adc: 16,
            timedelta_exposure: Duration::from_seconds(10.0),
            timedelta_exposure_min: Duration::from_seconds(2.0),
            timedelta_exposure_max: Duration::from_seconds(600.0),
            timedelta_exposure_step: Duration::from_milliseconds(100.0),
            timedelta_transfer: Duration::from_milliseconds(50.0),
            timedelta_readout: Duration::from_seconds(1.1),
        }
    }

    /// Largest value the ADC can report.
    pub fn saturation_level(&self) -> f64 {
        2f64.powi(self.bits_adc as i32) - 1.0
    }

    pub fn exposure_in_range(&self, exposure: Duration) -> bool {
        exposure >= self.timedelta_exposure_min && exposure <= self.timedelta_exposure_max
    }
}
