//! Logical axis names and the metadata record shared by every image variant.

use std::sync::Arc;

use ndarray::{ArrayView2, ArrayViewD, Axis, Dimension, Ix2, IxDyn, indices};

use crate::ccd::common::error::{CcdError, Result};
use crate::ccd::frame::coords::PixelCoords;
use crate::ccd::frame::header::FrameHeader;
use crate::ccd::sensor::SensorGeometry;

pub const DEFAULT_AXIS_X: &str = "detector_x";
pub const DEFAULT_AXIS_Y: &str = "detector_y";
pub const DEFAULT_AXIS_TAP_X: &str = "tap_x";
pub const DEFAULT_AXIS_TAP_Y: &str = "tap_y";

/// Names of the batch and spatial axes of an image array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAxes {
    pub batch: Vec<String>,
    pub x: String,
    pub y: String,
}

impl Default for ImageAxes {
    fn default() -> Self {
        Self {
            batch: Vec::new(),
            x: DEFAULT_AXIS_X.to_string(),
            y: DEFAULT_AXIS_Y.to_string(),
        }
    }
}

impl ImageAxes {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            batch: Vec::new(),
            x: x.into(),
            y: y.into(),
        }
    }

    pub fn with_batch<I, S>(mut self, batch: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.batch = batch.into_iter().map(Into::into).collect();
        self
    }
}

/// Names of the two tap-index axes of a tap image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapAxes {
    pub x: String,
    pub y: String,
}

impl Default for TapAxes {
    fn default() -> Self {
        Self {
            x: DEFAULT_AXIS_TAP_X.to_string(),
            y: DEFAULT_AXIS_TAP_Y.to_string(),
        }
    }
}

/// Everything an image carries besides its pixel values.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameMeta {
    pub header: FrameHeader,
    pub geometry: Arc<SensorGeometry>,
    pub axes: ImageAxes,
    pub pixel: PixelCoords,
}

/// Row-major list of every index into `batch_shape`.
pub fn batch_indices(batch_shape: &[usize]) -> Vec<Vec<usize>> {
    indices(IxDyn(batch_shape))
        .into_iter()
        .map(|index| index.slice().to_vec())
        .collect()
}

/// The trailing two-dimensional image at `index` along the leading axes.
///
/// `index` must address every leading axis.
pub(crate) fn image_at<'a>(
    data: ArrayViewD<'a, f64>,
    index: &[usize],
) -> Result<ArrayView2<'a, f64>> {
    let leading = &data.shape()[..data.ndim().saturating_sub(2)];
    if index.len() != leading.len() {
        return Err(CcdError::Shape(format!(
            "index {index:?} does not address leading axes {leading:?}"
        )));
    }
    if let Some((axis, (&i, &len))) = index
        .iter()
        .zip(leading)
        .enumerate()
        .find(|(_, (i, len))| **i >= **len)
    {
        return Err(CcdError::Shape(format!(
            "index {i} out of bounds for axis {axis} of length {len}"
        )));
    }
    let mut view = data;
    for &i in index {
        view = view.index_axis_move(Axis(0), i);
    }
    Ok(view.into_dimensionality::<Ix2>()?)
}
