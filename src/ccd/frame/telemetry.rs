//! Flat key/value telemetry attached to each raw frame by the camera.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::ccd::common::error::{CcdError, Result};

/// Header keys written by the camera firmware.
pub mod keys {
    /// UTC timestamp at the midpoint of the exposure
    pub const TIME: &str = "IMG_TS";
    /// Measured exposure length in 25 ns counts
    pub const TIMEDELTA: &str = "MEAS_EXP";
    /// Requested exposure length in milliseconds
    pub const TIMEDELTA_REQUESTED: &str = "IMG_EXP";
    pub const SERIAL_NUMBER: &str = "CAM_SN";
    pub const RUN_MODE: &str = "RUN_MODE";
    pub const STATUS: &str = "IMG_STAT";
    pub const VOLTAGE_FPGA_VCCINT: &str = "FPGAVINT";
    pub const VOLTAGE_FPGA_VCCAUX: &str = "FPGAVAUX";
    pub const VOLTAGE_FPGA_VCCBRAM: &str = "FPGAVBRM";
    pub const TEMPERATURE_FPGA: &str = "FPGATEMP";
    pub const TEMPERATURE_ADC_1: &str = "ADCTEMP1";
    pub const TEMPERATURE_ADC_2: &str = "ADCTEMP2";
    pub const TEMPERATURE_ADC_3: &str = "ADCTEMP3";
    pub const TEMPERATURE_ADC_4: &str = "ADCTEMP4";
}

/// Telemetry record of a single frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Telemetry {
    entries: BTreeMap<String, String>,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parse a textual header made of `KEY = value / comment` lines.
    ///
    /// Quoted values keep everything between the quotes, including `/`.
    /// Lines without `=` are ignored.
    pub fn parse_header(text: &str) -> Self {
        let mut entries = BTreeMap::new();
        for line in text.lines() {
            let Some((key, rest)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            let rest = rest.trim();
            let value = if let Some(quoted) = rest.strip_prefix('\'') {
                quoted.split('\'').next().unwrap_or_default().trim_end()
            } else {
                rest.split('/').next().unwrap_or_default().trim()
            };
            entries.insert(key.to_string(), value.to_string());
        }
        Self { entries }
    }

    /// Render in the form accepted by [`Telemetry::parse_header`].
    pub fn to_header(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{k} = '{v}'\n"))
            .collect()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn required(&self, key: &str) -> Result<&str> {
        self.text(key)
            .ok_or_else(|| CcdError::MissingTelemetry(key.to_string()))
    }

    fn invalid(key: &str, value: &str) -> CcdError {
        CcdError::InvalidTelemetry {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    /// A non-negative integer counter.
    pub fn count(&self, key: &str) -> Result<u64> {
        let value = self.required(key)?;
        value.parse().map_err(|_| Self::invalid(key, value))
    }

    /// A 12-bit housekeeping ADC reading.
    pub fn adc_count(&self, key: &str) -> Result<u32> {
        let value = self.required(key)?;
        value.parse().map_err(|_| Self::invalid(key, value))
    }

    pub fn float(&self, key: &str) -> Result<f64> {
        let value = self.required(key)?;
        value.parse().map_err(|_| Self::invalid(key, value))
    }

    /// An ISO-8601 timestamp; values without an offset are taken as UTC.
    pub fn timestamp(&self, key: &str) -> Result<DateTime<Utc>> {
        let value = self.required(key)?;
        if let Ok(t) = DateTime::parse_from_rfc3339(value) {
            return Ok(t.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|t| t.and_utc())
            .map_err(|_| Self::invalid(key, value))
    }
}
