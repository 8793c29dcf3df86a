//! Images decomposed into the sub-images read out by each tap

use std::sync::Arc;

use ndarray::{ArrayD, ArrayView2, Axis};

use crate::ccd::common::error::Result;
use crate::ccd::frame::axes::{FrameMeta, ImageAxes, TapAxes, batch_indices, image_at};
use crate::ccd::frame::coords::PixelCoords;
use crate::ccd::frame::header::FrameHeader;
use crate::ccd::frame::sensor_frame::SensorFrame;
use crate::ccd::sensor::SensorGeometry;
use crate::ccd::taps::recombine;

/// An image or a batch of images from every tap of the sensor.
///
/// `data` is laid out as `[batch..., tap_x, tap_y, y, x]`. Each tap image is
/// in its native readout order: blank columns first, overscan columns last.
#[derive(Debug, Clone, PartialEq)]
pub struct TapFrame {
    data: ArrayD<f64>,
    meta: FrameMeta,
    tap_axes: TapAxes,
}

impl TapFrame {
    pub(crate) fn from_raw_parts(data: ArrayD<f64>, meta: FrameMeta, tap_axes: TapAxes) -> Self {
        Self {
            data,
            meta,
            tap_axes,
        }
    }

    pub(crate) fn with_data(&self, data: ArrayD<f64>) -> Self {
        Self {
            data,
            meta: self.meta.clone(),
            tap_axes: self.tap_axes.clone(),
        }
    }

    pub(crate) fn with_data_and_pixel(&self, data: ArrayD<f64>, pixel: PixelCoords) -> Self {
        Self {
            data,
            meta: FrameMeta {
                pixel,
                ..self.meta.clone()
            },
            tap_axes: self.tap_axes.clone(),
        }
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
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

    pub fn tap_axes(&self) -> &TapAxes {
        &self.tap_axes
    }

    pub fn pixel(&self) -> &PixelCoords {
        &self.meta.pixel
    }

    /// Number of pixels along the horizontal axis of each tap.
    pub fn num_x(&self) -> usize {
        self.data.shape()[self.data.ndim() - 1]
    }

    /// Number of pixels along the vertical axis of each tap.
    pub fn num_y(&self) -> usize {
        self.data.shape()[self.data.ndim() - 2]
    }

    pub fn num_tap_x(&self) -> usize {
        self.data.shape()[self.data.ndim() - 4]
    }

    pub fn num_tap_y(&self) -> usize {
        self.data.shape()[self.data.ndim() - 3]
    }

    pub fn batch_shape(&self) -> &[usize] {
        &self.data.shape()[..self.data.ndim() - 4]
    }

    pub(crate) fn tap_x_axis(&self) -> Axis {
        Axis(self.data.ndim() - 4)
    }

    pub(crate) fn tap_y_axis(&self) -> Axis {
        Axis(self.data.ndim() - 3)
    }

    pub(crate) fn y_axis(&self) -> Axis {
        Axis(self.data.ndim() - 2)
    }

    pub(crate) fn x_axis(&self) -> Axis {
        Axis(self.data.ndim() - 1)
    }

    pub fn named_shape(&self) -> Vec<(String, usize)> {
        let axes = &self.meta.axes;
        axes.batch
            .iter()
            .cloned()
            .chain([
                self.tap_axes.x.clone(),
                self.tap_axes.y.clone(),
                axes.y.clone(),
                axes.x.clone(),
            ])
            .zip(self.data.shape().iter().copied())
            .collect()
    }

    /// The `(tap_x, tap_y)` index of every tap, in storage order.
    pub fn tap_index(&self) -> Vec<(usize, usize)> {
        (0..self.num_tap_x())
            .flat_map(|tx| (0..self.num_tap_y()).map(move |ty| (tx, ty)))
            .collect()
    }

    /// Human-readable name of a tap, used when labelling plots and logs.
    pub fn label(tap_x: usize, tap_y: usize) -> String {
        format!("tap ({tap_x}, {tap_y})")
    }

    pub fn batch_indices(&self) -> Vec<Vec<usize>> {
        batch_indices(self.batch_shape())
    }

    /// The `[y, x]` image of one tap of one batch element.
    pub fn image(&self, index: &[usize], tap_x: usize, tap_y: usize) -> Result<ArrayView2<'_, f64>> {
        let mut full = index.to_vec();
        full.extend([tap_x, tap_y]);
        image_at(self.data.view(), &full)
    }

    /// Reassemble the whole-sensor image.
    pub fn recombine(&self) -> Result<SensorFrame> {
        recombine(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        assert_eq!(TapFrame::label(1, 0), "tap (1, 0)");
    }
}
