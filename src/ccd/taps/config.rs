//! Tap decomposition configuration types

use crate::ccd::frame::axes::{DEFAULT_AXIS_TAP_X, DEFAULT_AXIS_TAP_Y, TapAxes};

/// Configuration for splitting a sensor image into taps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    /// Names given to the two new tap-index axes
    pub tap_axes: TapAxes,
    /// Reject images whose extents are not a multiple of the tap grid.
    /// When false the trailing middle row/column is dropped.
    pub strict: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            tap_axes: TapAxes::default(),
            strict: false,
        }
    }
}

impl SplitConfig {
    pub fn builder() -> SplitConfigBuilder {
        SplitConfigBuilder::default()
    }
}

#[derive(Default)]
pub struct SplitConfigBuilder {
    axis_tap_x: Option<String>,
    axis_tap_y: Option<String>,
    strict: Option<bool>,
}

impl SplitConfigBuilder {
    pub fn axis_tap_x(mut self, name: impl Into<String>) -> Self {
        self.axis_tap_x = Some(name.into());
        self
    }

    pub fn axis_tap_y(mut self, name: impl Into<String>) -> Self {
        self.axis_tap_y = Some(name.into());
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    pub fn build(self) -> SplitConfig {
        let default = SplitConfig::default();
        SplitConfig {
            tap_axes: TapAxes {
                x: self.axis_tap_x.unwrap_or_else(|| DEFAULT_AXIS_TAP_X.to_string()),
                y: self.axis_tap_y.unwrap_or_else(|| DEFAULT_AXIS_TAP_Y.to_string()),
            },
            strict: self.strict.unwrap_or(default.strict),
        }
    }
}

/// Columns used to estimate the bias of each tap.
///
/// `None` selects every configured column of that kind, counted from the
/// active region outward for blank columns and inward for overscan columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiasRegion {
    pub num_blank: Option<usize>,
    pub num_overscan: Option<usize>,
}

impl Default for BiasRegion {
    fn default() -> Self {
        Self {
            num_blank: Some(0),
            num_overscan: None,
        }
    }
}

impl BiasRegion {
    pub fn new(num_blank: Option<usize>, num_overscan: Option<usize>) -> Self {
        Self {
            num_blank,
            num_overscan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_config_builder() {
        let config = SplitConfig::builder().axis_tap_y("row_tap").strict(true).build();
        assert_eq!(config.tap_axes.x, "tap_x");
        assert_eq!(config.tap_axes.y, "row_tap");
        assert!(config.strict);
        assert!(!SplitConfig::default().strict);
    }

    #[test]
    fn test_bias_region_default() {
        let region = BiasRegion::default();
        assert_eq!(region.num_blank, Some(0));
        assert_eq!(region.num_overscan, None);
    }
}
