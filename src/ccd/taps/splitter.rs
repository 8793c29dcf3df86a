//! Decomposition of whole-sensor images into per-tap images.
//!
//! Each tap shifts charge toward the center of the sensor, so the taps on
//! the far side of each axis are mirrored to present every tap image in its
//! native readout order.

use ndarray::{ArrayD, Axis, Slice, stack};
use tracing::{debug, instrument, warn};

use crate::ccd::common::error::{CcdError, Result};
use crate::ccd::frame::axes::FrameMeta;
use crate::ccd::frame::sensor_frame::SensorFrame;
use crate::ccd::frame::tap_frame::TapFrame;
use crate::ccd::sensor::{NUM_TAP_X, NUM_TAP_Y};
use crate::ccd::taps::config::SplitConfig;

/// Index of the tap nearest the origin along an axis.
const TAP_NEAR: usize = 0;

/// Index of the mirrored tap on the far side of an axis.
pub(crate) const TAP_FAR: usize = 1;

/// Window of the sensor axis read out by `tap` along that axis.
fn tap_window(tap: usize, num: usize, num_new: usize) -> Slice {
    if tap == TAP_NEAR {
        Slice::from(..num_new)
    } else {
        Slice::new((num - num_new) as isize, None, -1)
    }
}

/// Split `frame` into a `[batch..., tap_x, tap_y, y, x]` tap image.
#[instrument(skip(frame, config), fields(shape = ?frame.data().shape()))]
pub fn split(frame: &SensorFrame, config: &SplitConfig) -> Result<TapFrame> {
    let data = frame.data();
    let ndim = data.ndim();
    let (axis_y, axis_x) = (Axis(ndim - 2), Axis(ndim - 1));
    let tap_axis = Axis(ndim - 2);

    let (num_x, num_y) = (frame.num_x(), frame.num_y());
    if num_x % NUM_TAP_X != 0 || num_y % NUM_TAP_Y != 0 {
        if config.strict {
            return Err(CcdError::Shape(format!(
                "image extent {num_x}x{num_y} is not divisible by the {NUM_TAP_X}x{NUM_TAP_Y} tap grid"
            )));
        }
        warn!(
            num_x,
            num_y, "Image extent is not divisible by the tap grid, dropping the middle row/column"
        );
    }

    let num_x_new = num_x / NUM_TAP_X;
    let num_y_new = num_y / NUM_TAP_Y;
    if num_x_new == 0 || num_y_new == 0 {
        return Err(CcdError::InvalidDimensions(num_x_new, num_y_new));
    }

    let quadrant = |tap_x: usize, tap_y: usize| {
        data.slice_axis(axis_x, tap_window(tap_x, num_x, num_x_new))
            .slice_axis_move(axis_y, tap_window(tap_y, num_y, num_y_new))
    };

    let columns = (0..NUM_TAP_X)
        .map(|tap_x| {
            let views: Vec<_> = (0..NUM_TAP_Y).map(|tap_y| quadrant(tap_x, tap_y)).collect();
            stack(tap_axis, &views)
        })
        .collect::<std::result::Result<Vec<ArrayD<f64>>, _>>()?;
    let views: Vec<_> = columns.iter().map(|column| column.view()).collect();
    let taps = stack(tap_axis, &views)?;

    let meta = frame.meta();
    let pixel = meta.pixel.split(num_x_new, num_y_new)?;

    debug!(shape = ?taps.shape(), "Split sensor frame into taps");

    Ok(TapFrame::from_raw_parts(
        taps,
        FrameMeta {
            pixel,
            ..meta.clone()
        },
        config.tap_axes.clone(),
    ))
}
