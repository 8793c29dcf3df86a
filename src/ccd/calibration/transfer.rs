//! Transfer functions converting raw camera telemetry counts to physical units.
//!
//! Each function is pure. The two ADC thermistor channels share the same
//! resistance model and differ only in how resistance maps to temperature.

use crate::ccd::common::error::{CcdError, Result};
use crate::ccd::units::{Duration, Temperature, TemperatureExt, TimeExt, Voltage, VoltageExt};

/// Duration of a single exposure-counter tick in nanoseconds.
const EXPOSURE_TICK_NS: f64 = 25.0;

/// Full-scale reading of the 12-bit housekeeping ADC.
const ADC_FULL_SCALE: f64 = 4096.0;

/// Reference voltage of the FPGA system monitor.
const FPGA_VOLTAGE_REFERENCE: f64 = 3.0;

/// Kelvin span of the FPGA temperature sensor over the full ADC range.
const FPGA_TEMPERATURE_SPAN_K: f64 = 503.975;

/// Scale from counts to thermistor resistance (kΩ).
const THERMISTOR_SCALE: f64 = 9.814453125;

/// Beta-model constants for ADC thermistor 1.
const THERMISTOR_1_BETA: f64 = 3455.0;
const THERMISTOR_1_R_INF: f64 = 0.0927557;

/// Steinhart-Hart coefficients for ADC thermistors 2, 3 and 4.
const STEINHART_A: f64 = 0.0011275;
const STEINHART_B: f64 = 0.00023441;
const STEINHART_C: f64 = 0.000000086482;

/// Convert the measured exposure counter to a duration.
pub fn exposure_time(count: u64) -> Duration {
    Duration::from_nanoseconds(count as f64 * EXPOSURE_TICK_NS)
}

/// Convert an FPGA supply-voltage reading (VCCINT, VCCAUX or VCCBRAM).
pub fn fpga_voltage(count: u32) -> Voltage {
    Voltage::from_volts(count as f64 * FPGA_VOLTAGE_REFERENCE / ADC_FULL_SCALE)
}

/// Convert the FPGA die temperature reading.
pub fn fpga_temperature(count: u32) -> Temperature {
    Temperature::from_kelvin(count as f64 * FPGA_TEMPERATURE_SPAN_K / ADC_FULL_SCALE)
}

/// Thermistor resistance for an ADC temperature count.
///
/// The divider saturates at full scale, so `count >= 4096` has no resistance.
fn thermistor_resistance(count: u32) -> Result<f64> {
    let count = count as f64;
    let denominator = 1.0 - count / ADC_FULL_SCALE;
    if denominator <= 0.0 {
        return Err(CcdError::Domain(format!(
            "ADC temperature count {count} is at or beyond full scale {ADC_FULL_SCALE}"
        )));
    }
    Ok(THERMISTOR_SCALE * count / denominator)
}

fn finite_kelvin(kelvin: f64, count: u32) -> Result<Temperature> {
    if kelvin.is_finite() {
        Ok(Temperature::from_kelvin(kelvin))
    } else {
        Err(CcdError::Domain(format!(
            "ADC temperature count {count} has no finite temperature"
        )))
    }
}

/// Convert the reading of ADC thermistor 1 (beta model).
///
/// A count of zero yields absolute zero, the limit of the model as the
/// resistance vanishes.
pub fn adc_temperature_1(count: u32) -> Result<Temperature> {
    let r = thermistor_resistance(count)?;
    let kelvin = THERMISTOR_1_BETA / (r / THERMISTOR_1_R_INF).ln();
    finite_kelvin(kelvin, count)
}

/// Convert the readings of ADC thermistors 2, 3 and 4 (Steinhart-Hart model).
///
/// The cubic term is applied as `(c * ln r)^3`.
pub fn adc_temperature_234(count: u32) -> Result<Temperature> {
    let r = thermistor_resistance(count)?;
    let ln_r = r.ln();
    let kelvin = 1.0 / (STEINHART_A + STEINHART_B * ln_r + (STEINHART_C * ln_r).powi(3));
    finite_kelvin(kelvin, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ccd::units::ABSOLUTE_ZERO_C;
    use approx::assert_relative_eq;

    #[test]
    fn test_exposure_time() {
        assert_relative_eq!(exposure_time(40_000_000).as_seconds(), 1.0, epsilon = 1e-12);
        assert!(exposure_time(1).as_seconds() > 0.0);
        assert!(exposure_time(10) > exposure_time(1));
    }

    #[test]
    fn test_fpga_voltage() {
        assert_relative_eq!(fpga_voltage(4096).as_volts(), 3.0);
        assert!(fpga_voltage(10) > fpga_voltage(1));
        assert!(fpga_voltage(1).as_volts() > 0.0);
    }

    #[test]
    fn test_fpga_temperature() {
        assert_relative_eq!(fpga_temperature(4096).as_kelvin(), 503.975, epsilon = 1e-9);
        let t = fpga_temperature(2423).as_celsius();
        assert!((20.0..30.0).contains(&t), "got {t}");
    }

    #[test]
    fn test_adc_temperature_1() {
        let t1 = adc_temperature_1(1).unwrap().as_celsius();
        let t10 = adc_temperature_1(10).unwrap().as_celsius();
        assert_ne!(t1, t10);

        for count in [1000, 1500, 2000] {
            let t = adc_temperature_1(count).unwrap().as_celsius();
            assert!((-50.0..150.0).contains(&t), "count {count} gave {t}");
        }
    }

    #[test]
    fn test_adc_temperature_234() {
        let t1 = adc_temperature_234(1).unwrap().as_celsius();
        let t10 = adc_temperature_234(10).unwrap().as_celsius();
        assert_ne!(t1, t10);

        let t = adc_temperature_234(1000).unwrap().as_celsius();
        assert!((-50.0..150.0).contains(&t), "got {t}");
    }

    #[test]
    fn test_adc_temperature_full_scale_is_domain_error() {
        assert!(matches!(adc_temperature_1(4096), Err(CcdError::Domain(_))));
        assert!(matches!(adc_temperature_234(4096), Err(CcdError::Domain(_))));
        assert!(matches!(adc_temperature_1(5000), Err(CcdError::Domain(_))));
    }

    #[test]
    fn test_adc_temperature_zero_count() {
        let t = adc_temperature_1(0).unwrap().as_celsius();
        assert_relative_eq!(t, ABSOLUTE_ZERO_C, epsilon = 1e-9);
        let t = adc_temperature_234(0).unwrap().as_celsius();
        assert_relative_eq!(t, ABSOLUTE_ZERO_C, epsilon = 1e-9);
    }
}
