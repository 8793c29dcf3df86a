//! Dark current model for the CCD
//!
//! Dark current follows `f(T) = 122 T^3 exp(-6400 K / T)`, normalised so that
//! the model reproduces a measured reference rate at a reference temperature.

use crate::ccd::units::{Temperature, TemperatureExt};

/// Activation temperature of the thermal generation term, in kelvin.
const ACTIVATION_TEMPERATURE_K: f64 = 6400.0;

/// Prefactor of the thermal generation term.
const GENERATION_PREFACTOR: f64 = 122.0;

/// Reference dark current in electrons per pixel per second.
pub const REFERENCE_RATE: f64 = 0.2;

/// Temperature at which [`REFERENCE_RATE`] was measured, in kelvin.
pub const REFERENCE_TEMPERATURE_K: f64 = 248.0;

fn generation(kelvin: f64) -> f64 {
    GENERATION_PREFACTOR * kelvin.powi(3) * (-ACTIVATION_TEMPERATURE_K / kelvin).exp()
}

/// Dark current model anchored to a single reference measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DarkCurrentModel {
    /// Dark current at the reference temperature (e⁻/pixel/s)
    pub reference_rate: f64,
    /// Temperature of the reference measurement
    pub reference_temperature: Temperature,
}

impl Default for DarkCurrentModel {
    fn default() -> Self {
        Self {
            reference_rate: REFERENCE_RATE,
            reference_temperature: Temperature::from_kelvin(REFERENCE_TEMPERATURE_K),
        }
    }
}

impl DarkCurrentModel {
    pub fn new(reference_rate: f64, reference_temperature: Temperature) -> Self {
        Self {
            reference_rate,
            reference_temperature,
        }
    }

    /// Dark current in electrons per pixel per second at `temperature`.
    ///
    /// Evaluated as a ratio of generation terms, so the reference temperature
    /// returns the reference rate exactly.
    pub fn rate_at(&self, temperature: Temperature) -> f64 {
        let ratio = generation(temperature.as_kelvin())
            / generation(self.reference_temperature.as_kelvin());
        self.reference_rate * ratio
    }
}

/// Dark current at `temperature` using the default reference point
/// (0.2 e⁻/s at 248 K).
pub fn dark_current(temperature: Temperature) -> f64 {
    DarkCurrentModel::default().rate_at(temperature)
}
