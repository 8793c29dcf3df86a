//! Type-safe physical units for calibrated telemetry
//!
//! Thin aliases over the `uom` SI quantities plus extension traits for the
//! handful of units the camera telemetry is expressed in.

use uom::si::electric_potential::volt;
use uom::si::f64::*;
use uom::si::length::micrometer;
use uom::si::thermodynamic_temperature::{degree_celsius, kelvin};
use uom::si::time::{millisecond, nanosecond, second};

pub type Temperature = ThermodynamicTemperature;
pub type Voltage = ElectricPotential;
pub type Duration = Time;
pub type Length = uom::si::f64::Length;

/// Absolute zero expressed in degrees Celsius.
pub const ABSOLUTE_ZERO_C: f64 = -273.15;

pub trait TemperatureExt {
    fn from_celsius(celsius: f64) -> Self;
    fn as_celsius(&self) -> f64;
    fn from_kelvin(kelvin: f64) -> Self;
    fn as_kelvin(&self) -> f64;
}

impl TemperatureExt for Temperature {
    fn from_celsius(celsius: f64) -> Self {
        Temperature::new::<degree_celsius>(celsius)
    }

    fn as_celsius(&self) -> f64 {
        self.get::<degree_celsius>()
    }

    fn from_kelvin(k: f64) -> Self {
        Temperature::new::<kelvin>(k)
    }

    fn as_kelvin(&self) -> f64 {
        self.get::<kelvin>()
    }
}

pub trait TimeExt {
    fn from_seconds(s: f64) -> Self;
    fn as_seconds(&self) -> f64;
    fn from_milliseconds(ms: f64) -> Self;
    fn as_milliseconds(&self) -> f64;
    fn from_nanoseconds(ns: f64) -> Self;
}

impl TimeExt for Duration {
    fn from_seconds(s: f64) -> Self {
        Time::new::<second>(s)
    }

    fn as_seconds(&self) -> f64 {
        self.get::<second>()
    }

    fn from_milliseconds(ms: f64) -> Self {
        Time::new::<millisecond>(ms)
    }

    fn as_milliseconds(&self) -> f64 {
        self.get::<millisecond>()
    }

    fn from_nanoseconds(ns: f64) -> Self {
        Time::new::<nanosecond>(ns)
    }
}

pub trait VoltageExt {
    fn from_volts(v: f64) -> Self;
    fn as_volts(&self) -> f64;
}

impl VoltageExt for Voltage {
    fn from_volts(v: f64) -> Self {
        ElectricPotential::new::<volt>(v)
    }

    fn as_volts(&self) -> f64 {
        self.get::<volt>()
    }
}

pub trait LengthExt {
    fn from_micrometers(um: f64) -> Self;
    fn as_micrometers(&self) -> f64;
}

impl LengthExt for Length {
    fn from_micrometers(um: f64) -> Self {
        Length::new::<micrometer>(um)
    }

    fn as_micrometers(&self) -> f64 {
        self.get::<micrometer>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_temperature_conversions() {
        let t = Temperature::from_celsius(0.0);
        assert_relative_eq!(t.as_kelvin(), 273.15, epsilon = 1e-9);

        let t = Temperature::from_kelvin(248.0);
        assert_relative_eq!(t.as_celsius(), -25.15, epsilon = 1e-9);
    }

    #[test]
    fn test_time_conversions() {
        let t = Duration::from_milliseconds(1500.0);
        assert_relative_eq!(t.as_seconds(), 1.5, epsilon = 1e-12);
        assert_relative_eq!(Duration::from_nanoseconds(25.0).as_seconds(), 25e-9);
    }
}
