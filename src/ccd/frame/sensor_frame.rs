//! Whole-sensor images

use std::sync::Arc;

use ndarray::{ArrayD, ArrayView2};
use tracing::debug;

use crate::ccd::common::error::{CcdError, Result};
use crate::ccd::frame::axes::{FrameMeta, ImageAxes, batch_indices, image_at};
use crate::ccd::frame::coords::PixelCoords;
use crate::ccd::frame::header::FrameHeader;
use crate::ccd::frame::tap_frame::TapFrame;
use crate::ccd::frame::telemetry::Telemetry;
use crate::ccd::sensor::SensorGeometry;
use crate::ccd::taps::{BiasRegion, SplitConfig, recombine, split};

/// A single image or a batch of images covering the whole sensor.
///
/// `data` is laid out as `[batch..., y, x]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorFrame {
    data: ArrayD<f64>,
    meta: FrameMeta,
}

impl SensorFrame {
    /// Build a frame from raw pixel values and one telemetry record per batch element.
    pub fn new(
        data: ArrayD<f64>,
        telemetry: &[Telemetry],
        geometry: Arc<SensorGeometry>,
        axes: ImageAxes,
    ) -> Result<Self> {
        let batch_shape = Self::check_layout(&data, &axes)?;
        let header = FrameHeader::from_telemetry(telemetry, &batch_shape)?;
        Self::from_parts(data, header, geometry, axes)
    }

    /// Build a frame from already-calibrated metadata.
    pub fn from_parts(
        data: ArrayD<f64>,
        header: FrameHeader,
        geometry: Arc<SensorGeometry>,
        axes: ImageAxes,
    ) -> Result<Self> {
        let batch_shape = Self::check_layout(&data, &axes)?;
        header.check_broadcast(&batch_shape)?;

        let ndim = data.ndim();
        let (num_y, num_x) = (data.shape()[ndim - 2], data.shape()[ndim - 1]);
        if num_x == 0 || num_y == 0 {
            return Err(CcdError::InvalidDimensions(num_x, num_y));
        }
        debug!(shape = ?data.shape(), "Constructed sensor frame");

        Ok(Self {
            data,
            meta: FrameMeta {
                header,
                geometry,
                axes,
                pixel: PixelCoords::sensor(num_x, num_y),
            },
        })
    }

    pub(crate) fn from_raw_parts(data: ArrayD<f64>, meta: FrameMeta) -> Self {
        Self { data, meta }
    }

    fn check_layout(data: &ArrayD<f64>, axes: &ImageAxes) -> Result<Vec<usize>> {
        if data.ndim() < 2 {
            return Err(CcdError::Shape(format!(
                "image needs two spatial axes, got shape {:?}",
                data.shape()
            )));
        }
        let batch_shape = data.shape()[..data.ndim() - 2].to_vec();
        if batch_shape.len() != axes.batch.len() {
            return Err(CcdError::Shape(format!(
                "{} batch axis names for batch shape {:?}",
                axes.batch.len(),
                batch_shape
            )));
        }
        Ok(batch_shape)
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn into_data(self) -> ArrayD<f64> {
        self.data
    }

    pub fn meta(&self) -> &FrameMeta {
        &self.meta
    }

    pub fn header(&self) -> &FrameHeader {
        &self.meta.header
    }

    pub fn geometry(&self) -> &Arc<SensorGeometry> {
        &self.meta.geometry
    }

    pub fn axes(&self) -> &ImageAxes {
        &self.meta.axes
    }

    pub fn pixel(&self) -> &PixelCoords {
        &self.meta.pixel
    }

    pub fn num_x(&self) -> usize {
        self.data.shape()[self.data.ndim() - 1]
    }

    pub fn num_y(&self) -> usize {
        self.data.shape()[self.data.ndim() - 2]
    }

    pub fn batch_shape(&self) -> &[usize] {
        &self.data.shape()[..self.data.ndim() - 2]
    }

    /// Axis names paired with their lengths, in storage order.
    pub fn named_shape(&self) -> Vec<(String, usize)> {
        let axes = &self.meta.axes;
        axes.batch
            .iter()
            .cloned()
            .chain([axes.y.clone(), axes.x.clone()])
            .zip(self.data.shape().iter().copied())
            .collect()
    }

    pub fn batch_indices(&self) -> Vec<Vec<usize>> {
        batch_indices(self.batch_shape())
    }

    /// The two-dimensional `[y, x]` image of one batch element.
    pub fn image(&self, index: &[usize]) -> Result<ArrayView2<'_, f64>> {
        image_at(self.data.view(), index)
    }

    /// Split into per-tap images.
    pub fn taps(&self, config: &SplitConfig) -> Result<TapFrame> {
        split(self, config)
    }

    /// These images with the per-tap bias removed, using the default bias region.
    pub fn unbiased(&self) -> Result<Self> {
        self.unbiased_with(&SplitConfig::default(), &BiasRegion::default())
    }

    pub fn unbiased_with(&self, config: &SplitConfig, region: &BiasRegion) -> Result<Self> {
        recombine(&self.taps(config)?.unbiased_with(region)?)
    }

    /// These images without the blank and overscan columns of every tap.
    pub fn active(&self) -> Result<Self> {
        self.active_with(&SplitConfig::default())
    }

    pub fn active_with(&self, config: &SplitConfig) -> Result<Self> {
        recombine(&self.taps(config)?.active()?)
    }
}
