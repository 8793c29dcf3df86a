//! Reassembly of per-tap images into whole-sensor images.

use ndarray::{ArrayD, Axis, concatenate};
use tracing::{debug, instrument};

use crate::ccd::common::error::{CcdError, Result};
use crate::ccd::frame::axes::FrameMeta;
use crate::ccd::frame::sensor_frame::SensorFrame;
use crate::ccd::frame::tap_frame::TapFrame;
use crate::ccd::sensor::{NUM_TAP_X, NUM_TAP_Y};
use crate::ccd::taps::splitter::TAP_FAR;

/// Concatenate the tap images of `taps` back into `[batch..., y, x]` sensor order.
///
/// Extents dropped when splitting an odd-sized image are not restored.
#[instrument(skip(taps), fields(shape = ?taps.data().shape()))]
pub fn recombine(taps: &TapFrame) -> Result<SensorFrame> {
    if taps.num_tap_x() != NUM_TAP_X || taps.num_tap_y() != NUM_TAP_Y {
        return Err(CcdError::Shape(format!(
            "expected a {NUM_TAP_X}x{NUM_TAP_Y} tap grid, got {}x{}",
            taps.num_tap_x(),
            taps.num_tap_y()
        )));
    }

    let data = taps.data();
    // Removing both tap axes leaves the batch axes followed by `[y, x]`.
    let ndim = data.ndim() - 2;
    let (axis_y, axis_x) = (Axis(ndim - 2), Axis(ndim - 1));

    let rows = (0..NUM_TAP_Y)
        .map(|tap_y| {
            let columns: Vec<_> = (0..NUM_TAP_X)
                .map(|tap_x| {
                    let mut view = data
                        .index_axis(taps.tap_x_axis(), tap_x)
                        .index_axis_move(Axis(taps.tap_y_axis().index() - 1), tap_y);
                    if tap_x == TAP_FAR {
                        view.invert_axis(axis_x);
                    }
                    if tap_y == TAP_FAR {
                        view.invert_axis(axis_y);
                    }
                    view
                })
                .collect();
            concatenate(axis_x, &columns)
        })
        .collect::<std::result::Result<Vec<ArrayD<f64>>, _>>()?;
    let views: Vec<_> = rows.iter().map(|row| row.view()).collect();
    let sensor = concatenate(axis_y, &views)?;

    let meta = taps.meta();
    let pixel = meta.pixel.join()?;

    debug!(shape = ?sensor.shape(), "Recombined taps into sensor frame");

    Ok(SensorFrame::from_raw_parts(
        sensor,
        FrameMeta {
            pixel,
            ..meta.clone()
        },
    ))
}
