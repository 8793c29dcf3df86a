//! Calibrated per-frame metadata

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::ccd::calibration::{
    adc_temperature_1, adc_temperature_234, exposure_time, fpga_temperature, fpga_voltage,
};
use crate::ccd::common::error::{CcdError, Result};
use crate::ccd::frame::field::Field;
use crate::ccd::frame::telemetry::{Telemetry, keys};
use crate::ccd::units::{Duration, Temperature, TemperatureExt, TimeExt, Voltage, VoltageExt};

/// Metadata of a single image or a batch of images.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameHeader {
    /// UTC time at the midpoint of the exposure
    pub time: Field<DateTime<Utc>>,
    /// Measured exposure length
    pub timedelta: Field<Duration>,
    pub timedelta_requested: Field<Duration>,
    pub serial_number: Option<Field<String>>,
    pub run_mode: Option<Field<String>>,
    pub status: Option<Field<String>>,
    pub voltage_fpga_vccint: Field<Voltage>,
    pub voltage_fpga_vccaux: Field<Voltage>,
    pub voltage_fpga_vccbram: Field<Voltage>,
    pub temperature_fpga: Field<Temperature>,
    pub temperature_adc_1: Field<Temperature>,
    pub temperature_adc_2: Field<Temperature>,
    pub temperature_adc_3: Field<Temperature>,
    pub temperature_adc_4: Field<Temperature>,
}

/// The metadata of one element of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRecord {
    pub time: DateTime<Utc>,
    pub timedelta: Duration,
    pub timedelta_requested: Duration,
    pub serial_number: Option<String>,
    pub run_mode: Option<String>,
    pub status: Option<String>,
    pub voltage_fpga_vccint: Voltage,
    pub voltage_fpga_vccaux: Voltage,
    pub voltage_fpga_vccbram: Voltage,
    pub temperature_fpga: Temperature,
    pub temperature_adc_1: Temperature,
    pub temperature_adc_2: Temperature,
    pub temperature_adc_3: Temperature,
    pub temperature_adc_4: Temperature,
}

impl HeaderRecord {
    /// Human-readable `KEY = value` description of the calibrated metadata.
    pub fn describe(&self) -> String {
        let mut lines = vec![
            format!("TIME = '{}'", self.time.to_rfc3339()),
            format!("TIMEDELTA = {:.9} / s", self.timedelta.as_seconds()),
            format!(
                "TIMEDELTA_REQUESTED = {:.6} / s",
                self.timedelta_requested.as_seconds()
            ),
        ];
        for (key, value) in [
            ("SERIAL_NUMBER", &self.serial_number),
            ("RUN_MODE", &self.run_mode),
            ("STATUS", &self.status),
        ] {
            if let Some(value) = value {
                lines.push(format!("{key} = '{value}'"));
            }
        }
        for (key, value) in [
            ("VOLTAGE_FPGA_VCCINT", self.voltage_fpga_vccint),
            ("VOLTAGE_FPGA_VCCAUX", self.voltage_fpga_vccaux),
            ("VOLTAGE_FPGA_VCCBRAM", self.voltage_fpga_vccbram),
        ] {
            lines.push(format!("{key} = {:.4} / V", value.as_volts()));
        }
        for (key, value) in [
            ("TEMPERATURE_FPGA", self.temperature_fpga),
            ("TEMPERATURE_ADC_1", self.temperature_adc_1),
            ("TEMPERATURE_ADC_2", self.temperature_adc_2),
            ("TEMPERATURE_ADC_3", self.temperature_adc_3),
            ("TEMPERATURE_ADC_4", self.temperature_adc_4),
        ] {
            lines.push(format!("{key} = {:.3} / deg C", value.as_celsius()));
        }
        lines.join("\n")
    }
}

struct Columns {
    time: Vec<DateTime<Utc>>,
    timedelta: Vec<Duration>,
    timedelta_requested: Vec<Duration>,
    serial_number: Vec<Option<String>>,
    run_mode: Vec<Option<String>>,
    status: Vec<Option<String>>,
    voltage_fpga_vccint: Vec<Voltage>,
    voltage_fpga_vccaux: Vec<Voltage>,
    voltage_fpga_vccbram: Vec<Voltage>,
    temperature_fpga: Vec<Temperature>,
    temperature_adc_1: Vec<Temperature>,
    temperature_adc_2: Vec<Temperature>,
    temperature_adc_3: Vec<Temperature>,
    temperature_adc_4: Vec<Temperature>,
}

impl Columns {
    fn with_capacity(n: usize) -> Self {
        Self {
            time: Vec::with_capacity(n),
            timedelta: Vec::with_capacity(n),
            timedelta_requested: Vec::with_capacity(n),
            serial_number: Vec::with_capacity(n),
            run_mode: Vec::with_capacity(n),
            status: Vec::with_capacity(n),
            voltage_fpga_vccint: Vec::with_capacity(n),
            voltage_fpga_vccaux: Vec::with_capacity(n),
            voltage_fpga_vccbram: Vec::with_capacity(n),
            temperature_fpga: Vec::with_capacity(n),
            temperature_adc_1: Vec::with_capacity(n),
            temperature_adc_2: Vec::with_capacity(n),
            temperature_adc_3: Vec::with_capacity(n),
            temperature_adc_4: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, telemetry: &Telemetry) -> Result<()> {
        self.time.push(telemetry.timestamp(keys::TIME)?);
        self.timedelta
            .push(exposure_time(telemetry.count(keys::TIMEDELTA)?));
        self.timedelta_requested.push(Duration::from_milliseconds(
            telemetry.float(keys::TIMEDELTA_REQUESTED)?,
        ));
        self.serial_number
            .push(telemetry.text(keys::SERIAL_NUMBER).map(str::to_string));
        self.run_mode
            .push(telemetry.text(keys::RUN_MODE).map(str::to_string));
        self.status
            .push(telemetry.text(keys::STATUS).map(str::to_string));
        self.voltage_fpga_vccint
            .push(fpga_voltage(telemetry.adc_count(keys::VOLTAGE_FPGA_VCCINT)?));
        self.voltage_fpga_vccaux
            .push(fpga_voltage(telemetry.adc_count(keys::VOLTAGE_FPGA_VCCAUX)?));
        self.voltage_fpga_vccbram
            .push(fpga_voltage(telemetry.adc_count(keys::VOLTAGE_FPGA_VCCBRAM)?));
        self.temperature_fpga
            .push(fpga_temperature(telemetry.adc_count(keys::TEMPERATURE_FPGA)?));
        self.temperature_adc_1
            .push(adc_temperature_1(telemetry.adc_count(keys::TEMPERATURE_ADC_1)?)?);
        self.temperature_adc_2
            .push(adc_temperature_234(telemetry.adc_count(keys::TEMPERATURE_ADC_2)?)?);
        self.temperature_adc_3
            .push(adc_temperature_234(telemetry.adc_count(keys::TEMPERATURE_ADC_3)?)?);
        self.temperature_adc_4
            .push(adc_temperature_234(telemetry.adc_count(keys::TEMPERATURE_ADC_4)?)?);
        Ok(())
    }
}

/// Optional text columns become a field only when present on every frame.
fn optional_text(batch_shape: &[usize], values: Vec<Option<String>>) -> Result<Option<Field<String>>> {
    let values: Option<Vec<String>> = values.into_iter().collect();
    values
        .map(|values| Field::from_values(batch_shape, values))
        .transpose()
}

impl FrameHeader {
    /// Calibrate one telemetry record per batch element, in row-major order.
    pub fn from_telemetry(telemetry: &[Telemetry], batch_shape: &[usize]) -> Result<Self> {
        let expected: usize = batch_shape.iter().product();
        if telemetry.len() != expected {
            return Err(CcdError::Shape(format!(
                "{} telemetry records for batch shape {:?} ({} frames)",
                telemetry.len(),
                batch_shape,
                expected
            )));
        }
        debug!("Calibrating telemetry for {} frame(s)", expected);

        let mut columns = Columns::with_capacity(expected);
        for record in telemetry {
            columns.push(record)?;
        }

        Ok(Self {
            time: Field::from_values(batch_shape, columns.time)?,
            timedelta: Field::from_values(batch_shape, columns.timedelta)?,
            timedelta_requested: Field::from_values(batch_shape, columns.timedelta_requested)?,
            serial_number: optional_text(batch_shape, columns.serial_number)?
                .map(Field::collapse),
            run_mode: optional_text(batch_shape, columns.run_mode)?,
            status: optional_text(batch_shape, columns.status)?,
            voltage_fpga_vccint: Field::from_values(batch_shape, columns.voltage_fpga_vccint)?,
            voltage_fpga_vccaux: Field::from_values(batch_shape, columns.voltage_fpga_vccaux)?,
            voltage_fpga_vccbram: Field::from_values(batch_shape, columns.voltage_fpga_vccbram)?,
            temperature_fpga: Field::from_values(batch_shape, columns.temperature_fpga)?,
            temperature_adc_1: Field::from_values(batch_shape, columns.temperature_adc_1)?,
            temperature_adc_2: Field::from_values(batch_shape, columns.temperature_adc_2)?,
            temperature_adc_3: Field::from_values(batch_shape, columns.temperature_adc_3)?,
            temperature_adc_4: Field::from_values(batch_shape, columns.temperature_adc_4)?,
        })
    }

    /// A header with the same value on every frame, mainly for synthetic data.
    pub fn uniform(record: HeaderRecord) -> Self {
        Self {
            time: record.time.into(),
            timedelta: record.timedelta.into(),
            timedelta_requested: record.timedelta_requested.into(),
            serial_number: record.serial_number.map(Field::Uniform),
            run_mode: record.run_mode.map(Field::Uniform),
            status: record.status.map(Field::Uniform),
            voltage_fpga_vccint: record.voltage_fpga_vccint.into(),
            voltage_fpga_vccaux: record.voltage_fpga_vccaux.into(),
            voltage_fpga_vccbram: record.voltage_fpga_vccbram.into(),
            temperature_fpga: record.temperature_fpga.into(),
            temperature_adc_1: record.temperature_adc_1.into(),
            temperature_adc_2: record.temperature_adc_2.into(),
            temperature_adc_3: record.temperature_adc_3.into(),
            temperature_adc_4: record.temperature_adc_4.into(),
        }
    }

    /// Check every field against the batch shape of the owning image.
    pub fn check_broadcast(&self, batch_shape: &[usize]) -> Result<()> {
        self.time.check_broadcast(batch_shape)?;
        self.timedelta.check_broadcast(batch_shape)?;
        self.timedelta_requested.check_broadcast(batch_shape)?;
        for field in [&self.serial_number, &self.run_mode, &self.status]
            .into_iter()
            .flatten()
        {
            field.check_broadcast(batch_shape)?;
        }
        for field in [
            &self.voltage_fpga_vccint,
            &self.voltage_fpga_vccaux,
            &self.voltage_fpga_vccbram,
        ] {
            field.check_broadcast(batch_shape)?;
        }
        for field in [
            &self.temperature_fpga,
            &self.temperature_adc_1,
            &self.temperature_adc_2,
            &self.temperature_adc_3,
            &self.temperature_adc_4,
        ] {
            field.check_broadcast(batch_shape)?;
        }
        Ok(())
    }

    /// Metadata of the batch element at `index`.
    pub fn record(&self, index: &[usize]) -> Result<HeaderRecord> {
        Ok(HeaderRecord {
            time: *self.time.get(index)?,
            timedelta: *self.timedelta.get(index)?,
            timedelta_requested: *self.timedelta_requested.get(index)?,
            serial_number: self.serial_number.as_ref().map(|f| f.get(index).cloned()).transpose()?,
            run_mode: self.run_mode.as_ref().map(|f| f.get(index).cloned()).transpose()?,
            status: self.status.as_ref().map(|f| f.get(index).cloned()).transpose()?,
            voltage_fpga_vccint: *self.voltage_fpga_vccint.get(index)?,
            voltage_fpga_vccaux: *self.voltage_fpga_vccaux.get(index)?,
            voltage_fpga_vccbram: *self.voltage_fpga_vccbram.get(index)?,
            temperature_fpga: *self.temperature_fpga.get(index)?,
            temperature_adc_1: *self.temperature_adc_1.get(index)?,
            temperature_adc_2: *self.temperature_adc_2.get(index)?,
            temperature_adc_3: *self.temperature_adc_3.get(index)?,
            temperature_adc_4: *self.temperature_adc_4.get(index)?,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    pub(crate) fn sample_telemetry(exposure_counts: u64, serial: &str) -> Telemetry {
        Telemetry::from_pairs([
            (keys::TIME, "2024-03-25T20:49:00".to_string()),
            (keys::TIMEDELTA, exposure_counts.to_string()),
            (keys::TIMEDELTA_REQUESTED, "10000".to_string()),
            (keys::SERIAL_NUMBER, serial.to_string()),
            (keys::RUN_MODE, "sequence".to_string()),
            (keys::STATUS, "completed".to_string()),
            (keys::VOLTAGE_FPGA_VCCINT, "1365".to_string()),
            (keys::VOLTAGE_FPGA_VCCAUX, "3413".to_string()),
            (keys::VOLTAGE_FPGA_VCCBRAM, "1365".to_string()),
            (keys::TEMPERATURE_FPGA, "2423".to_string()),
            (keys::TEMPERATURE_ADC_1, "1000".to_string()),
            (keys::TEMPERATURE_ADC_2, "1000".to_string()),
            (keys::TEMPERATURE_ADC_3, "1100".to_string()),
            (keys::TEMPERATURE_ADC_4, "1200".to_string()),
        ])
    }

    pub(crate) fn sample_record() -> HeaderRecord {
        HeaderRecord {
            time: Utc.with_ymd_and_hms(2024, 3, 25, 20, 49, 0).unwrap(),
            timedelta: Duration::from_seconds(9.98),
            timedelta_requested: Duration::from_seconds(10.0),
            serial_number: Some("SN-001".to_string()),
            run_mode: Some("sequence".to_string()),
            status: Some("completed".to_string()),
            voltage_fpga_vccint: Voltage::from_volts(1.0),
            voltage_fpga_vccaux: Voltage::from_volts(2.5),
            voltage_fpga_vccbram: Voltage::from_volts(1.0),
            temperature_fpga: Temperature::from_celsius(20.0),
            temperature_adc_1: Temperature::from_celsius(21.0),
            temperature_adc_2: Temperature::from_celsius(22.0),
            temperature_adc_3: Temperature::from_celsius(23.0),
            temperature_adc_4: Temperature::from_celsius(24.0),
        }
    }

    #[test]
    fn test_from_telemetry_single_frame() {
        let header = FrameHeader::from_telemetry(&[sample_telemetry(400_000_000, "SN-1")], &[]).unwrap();
        let record = header.record(&[]).unwrap();
        assert_relative_eq!(record.timedelta.as_seconds(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(record.timedelta_requested.as_seconds(), 10.0, epsilon = 1e-9);
        assert_eq!(record.serial_number.as_deref(), Some("SN-1"));

        let v = record.voltage_fpga_vccaux.as_volts();
        assert!((0.0..50.0).contains(&v));
        for t in [
            record.temperature_fpga,
            record.temperature_adc_1,
            record.temperature_adc_2,
            record.temperature_adc_3,
            record.temperature_adc_4,
        ] {
            assert!((0.0..100.0).contains(&t.as_celsius()), "got {}", t.as_celsius());
        }
    }

    #[test]
    fn test_from_telemetry_batch() {
        let telemetry = vec![
            sample_telemetry(400_000_000, "SN-1"),
            sample_telemetry(399_200_000, "SN-1"),
            sample_telemetry(404_000_000, "SN-1"),
        ];
        let header = FrameHeader::from_telemetry(&telemetry, &[3]).unwrap();
        assert!(matches!(header.timedelta, Field::PerFrame(_)));
        assert_eq!(header.serial_number, Some(Field::Uniform("SN-1".to_string())));
        assert_relative_eq!(header.record(&[1]).unwrap().timedelta.as_seconds(), 9.98, epsilon = 1e-9);
        assert!(header.check_broadcast(&[3]).is_ok());
        assert!(header.check_broadcast(&[4]).is_err());
    }

    #[test]
    fn test_record_outside_batch() {
        let telemetry = vec![sample_telemetry(1, "a"), sample_telemetry(2, "a")];
        let header = FrameHeader::from_telemetry(&telemetry, &[2]).unwrap();
        assert!(matches!(header.record(&[]), Err(CcdError::Shape(_))));
        assert!(matches!(header.record(&[2]), Err(CcdError::Shape(_))));
        assert!(header.record(&[1]).is_ok());
    }

    #[test]
    fn test_from_telemetry_count_mismatch() {
        let telemetry = vec![sample_telemetry(1, "a"), sample_telemetry(1, "a")];
        let result = FrameHeader::from_telemetry(&telemetry, &[3]);
        assert!(matches!(result, Err(CcdError::Shape(_))));
    }

    #[test]
    fn test_from_telemetry_saturated_adc() {
        let mut telemetry = sample_telemetry(1, "a");
        telemetry.insert(keys::TEMPERATURE_ADC_2, "4096");
        let result = FrameHeader::from_telemetry(&[telemetry], &[]);
        assert!(matches!(result, Err(CcdError::Domain(_))));
    }

    #[test]
    fn test_uniform_header_describe() {
        let header = FrameHeader::uniform(sample_record());
        let text = header.record(&[4, 1]).unwrap().describe();
        assert!(text.contains("RUN_MODE = 'sequence'"));
        assert!(text.contains("TEMPERATURE_ADC_4 = 24.000 / deg C"));
    }
}
