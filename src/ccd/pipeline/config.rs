//! Calibration pipeline configuration types

use crate::ccd::io::TiffCompression;
use crate::ccd::taps::{BiasRegion, SplitConfig};

/// Configuration for raw frame calibration
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// How frames are divided into taps for the per-tap operations
    pub split: SplitConfig,
    /// Columns used to estimate the bias of each tap
    pub bias_region: BiasRegion,
    /// Whether to subtract the per-tap bias
    pub remove_bias: bool,
    /// Whether to crop the blank and overscan columns from the output
    pub crop_active: bool,
    /// Compression method for the calibrated frames
    pub compression: TiffCompression,
    /// Name of the axis the input frames are stacked along
    pub batch_axis: String,
    /// Whether to reject empty rasters before calibration
    pub validate_dimensions: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            split: SplitConfig::default(),
            bias_region: BiasRegion::default(),
            remove_bias: true,
            crop_active: false,
            compression: TiffCompression::None,
            batch_axis: "time".to_string(),
            validate_dimensions: true,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Builder for PipelineConfig
#[derive(Default)]
pub struct PipelineConfigBuilder {
    split: Option<SplitConfig>,
    bias_region: Option<BiasRegion>,
    remove_bias: Option<bool>,
    crop_active: Option<bool>,
    compression: Option<TiffCompression>,
    batch_axis: Option<String>,
    validate_dimensions: Option<bool>,
}

impl PipelineConfigBuilder {
    pub fn split(mut self, split: SplitConfig) -> Self {
        self.split = Some(split);
        self
    }

    pub fn bias_region(mut self, region: BiasRegion) -> Self {
        self.bias_region = Some(region);
        self
    }

    pub fn remove_bias(mut self, enable: bool) -> Self {
        self.remove_bias = Some(enable);
        self
    }

    pub fn crop_active(mut self, enable: bool) -> Self {
        self.crop_active = Some(enable);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn batch_axis(mut self, name: impl Into<String>) -> Self {
        self.batch_axis = Some(name.into());
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();
        PipelineConfig {
            split: self.split.unwrap_or(default.split),
            bias_region: self.bias_region.unwrap_or(default.bias_region),
            remove_bias: self.remove_bias.unwrap_or(default.remove_bias),
            crop_active: self.crop_active.unwrap_or(default.crop_active),
            compression: self.compression.unwrap_or(default.compression),
            batch_axis: self.batch_axis.unwrap_or(default.batch_axis),
            validate_dimensions: self
                .validate_dimensions
                .unwrap_or(default.validate_dimensions),
        }
    }
}
