//! Bias estimation from the inactive columns of each tap, and active-region extraction.

use ndarray::{Array1, ArrayD, Axis, Slice};
use tracing::{debug, instrument};

use crate::ccd::common::error::{CcdError, Result};
use crate::ccd::frame::tap_frame::TapFrame;
use crate::ccd::taps::config::BiasRegion;

impl TapFrame {
    fn check_columns(&self) -> Result<(usize, usize)> {
        let geometry = self.geometry();
        let (num_blank, num_overscan) = (geometry.num_blank, geometry.num_overscan);
        if num_blank + num_overscan > self.num_x() {
            return Err(CcdError::Shape(format!(
                "tap images are {} columns wide, narrower than {num_blank} blank plus {num_overscan} overscan columns",
                self.num_x()
            )));
        }
        Ok((num_blank, num_overscan))
    }

    /// Selects the `num` blank columns next to the active region, all of them if `None`.
    pub fn blank_mask(&self, num: Option<usize>) -> Result<Array1<bool>> {
        let (num_blank, _) = self.check_columns()?;
        let num = num.unwrap_or(num_blank);
        if num > num_blank {
            return Err(CcdError::Range(format!(
                "requested {num} blank columns, the sensor has {num_blank}"
            )));
        }
        let start = num_blank - num;
        Ok(Array1::from_shape_fn(self.num_x(), |i| {
            (start..num_blank).contains(&i)
        }))
    }

    /// Selects the `num` overscan columns next to the active region, all of them if `None`.
    pub fn overscan_mask(&self, num: Option<usize>) -> Result<Array1<bool>> {
        let (_, num_overscan) = self.check_columns()?;
        let num = num.unwrap_or(num_overscan);
        if num > num_overscan {
            return Err(CcdError::Range(format!(
                "requested {num} overscan columns, the sensor has {num_overscan}"
            )));
        }
        let start = self.num_x() - num_overscan;
        Ok(Array1::from_shape_fn(self.num_x(), |i| {
            (start..start + num).contains(&i)
        }))
    }

    /// Mean of every tap over the blank and overscan columns selected by `region`.
    ///
    /// The result has shape `[batch..., tap_x, tap_y]`.
    #[instrument(skip(self), fields(shape = ?self.data().shape()))]
    pub fn bias(&self, region: &BiasRegion) -> Result<ArrayD<f64>> {
        let blank = self.blank_mask(region.num_blank)?;
        let overscan = self.overscan_mask(region.num_overscan)?;
        let columns: Vec<usize> = blank
            .iter()
            .zip(overscan.iter())
            .enumerate()
            .filter(|&(_, (&b, &o))| b || o)
            .map(|(i, _)| i)
            .collect();
        if columns.is_empty() {
            return Err(CcdError::Range(
                "bias region selects no blank or overscan columns".to_string(),
            ));
        }
        debug!(?columns, "Estimating bias");

        let selected = self.data().select(self.x_axis(), &columns);
        let empty = || CcdError::Range("bias region is empty".to_string());
        selected
            .mean_axis(self.x_axis())
            .ok_or_else(empty)?
            .mean_axis(self.y_axis())
            .ok_or_else(empty)
    }

    /// These tap images minus their bias over the default region.
    pub fn unbiased(&self) -> Result<Self> {
        self.unbiased_with(&BiasRegion::default())
    }

    pub fn unbiased_with(&self, region: &BiasRegion) -> Result<Self> {
        let bias = self.bias(region)?;
        let n = bias.ndim();
        let bias = bias.insert_axis(Axis(n)).insert_axis(Axis(n + 1));
        Ok(self.with_data(self.data() - &bias))
    }

    /// These tap images without their blank and overscan columns.
    pub fn active(&self) -> Result<Self> {
        let (num_blank, num_overscan) = self.check_columns()?;
        let window = Slice::from(num_blank..self.num_x() - num_overscan);
        let data = self.data().slice_axis(self.x_axis(), window).to_owned();
        let pixel = self.pixel().slice_x(window);
        Ok(self.with_data_and_pixel(data, pixel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ccd::frame::axes::ImageAxes;
    use crate::ccd::frame::header::FrameHeader;
    use crate::ccd::frame::header::tests::sample_record;
    use crate::ccd::frame::sensor_frame::SensorFrame;
    use crate::ccd::sensor::SensorGeometry;
    use crate::ccd::taps::SplitConfig;
    use approx::assert_abs_diff_eq;
    use ndarray::{IxDyn, array};
    use std::sync::Arc;

    /// A 2x2 tap sensor with 3 blank and 2 overscan columns per tap.
    fn geometry() -> Arc<SensorGeometry> {
        Arc::new(
            SensorGeometry::builder()
                .num_pixel(24, 8)
                .num_blank(3)
                .num_overscan(2)
                .build()
                .unwrap(),
        )
    }

    fn frame_from(data: ArrayD<f64>, batch: &[&str]) -> SensorFrame {
        SensorFrame::from_parts(
            data,
            FrameHeader::uniform(sample_record()),
            geometry(),
            ImageAxes::default().with_batch(batch.iter().copied()),
        )
        .unwrap()
    }

    /// Tap images of 12 columns: blank `[0, 3)`, active `[3, 10)`, overscan `[10, 12)`.
    fn taps(data: ArrayD<f64>, batch: &[&str]) -> TapFrame {
        frame_from(data, batch).taps(&SplitConfig::default()).unwrap()
    }

    #[test]
    fn test_masks() {
        let taps = taps(ArrayD::zeros(IxDyn(&[8, 24])), &[]);
        let blank = taps.blank_mask(None).unwrap();
        assert_eq!(blank.len(), 12);
        assert_eq!(blank.iter().filter(|&&b| b).count(), 3);
        assert!(blank[0] && blank[2] && !blank[3]);

        let blank = taps.blank_mask(Some(1)).unwrap();
        assert!(!blank[1] && blank[2] && !blank[3]);

        let overscan = taps.overscan_mask(Some(1)).unwrap();
        assert!(!overscan[9] && overscan[10] && !overscan[11]);
        assert!(taps.overscan_mask(Some(0)).unwrap().iter().all(|&o| !o));
    }

    #[test]
    fn test_masks_out_of_range() {
        let taps = taps(ArrayD::zeros(IxDyn(&[8, 24])), &[]);
        assert!(matches!(taps.blank_mask(Some(4)), Err(CcdError::Range(_))));
        assert!(matches!(taps.overscan_mask(Some(3)), Err(CcdError::Range(_))));
        assert!(matches!(
            taps.bias(&BiasRegion::new(Some(0), Some(0))),
            Err(CcdError::Range(_))
        ));
    }

    #[test]
    fn test_bias_per_tap() {
        // Every tap carries a distinct pedestal.
        let mut data = ArrayD::<f64>::zeros(IxDyn(&[8, 24]));
        for ((y, x), value) in data
            .view_mut()
            .into_dimensionality::<ndarray::Ix2>()
            .unwrap()
            .indexed_iter_mut()
        {
            *value = 100.0 * (1 + x / 12 + 2 * (y / 4)) as f64;
        }
        let taps = taps(data, &[]);

        let bias = taps.bias(&BiasRegion::default()).unwrap();
        assert_eq!(bias.shape(), &[2, 2]);
        assert_eq!(
            bias.into_dimensionality::<ndarray::Ix2>().unwrap(),
            array![[100.0, 300.0], [200.0, 400.0]]
        );
    }

    #[test]
    fn test_bias_over_blank_and_overscan() {
        let data = ArrayD::from_shape_fn(IxDyn(&[8, 24]), |i| i[1].min(23 - i[1]) as f64);
        let taps = taps(data, &[]);
        // Tap columns hold their distance from the sensor edge.
        let bias = taps.bias(&BiasRegion::new(Some(1), Some(1))).unwrap();
        assert!(bias.iter().all(|&b| b == (2.0 + 10.0) / 2.0));
        let bias = taps.bias(&BiasRegion::new(None, None)).unwrap();
        for b in bias.iter() {
            assert_abs_diff_eq!(*b, (0.0 + 1.0 + 2.0 + 10.0 + 11.0) / 5.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_bias_keeps_batch_axes() {
        let data = ArrayD::from_shape_fn(IxDyn(&[3, 8, 24]), |i| i[0] as f64);
        let taps = taps(data, &["t"]);
        let bias = taps.bias(&BiasRegion::default()).unwrap();
        assert_eq!(bias.shape(), &[3, 2, 2]);
        assert_eq!(bias[[2, 1, 0]], 2.0);
    }

    #[test]
    fn test_bias_propagates_nan() {
        let mut data = ArrayD::zeros(IxDyn(&[8, 24]));
        // Overscan column of the upper-right tap.
        data[[0, 13]] = f64::NAN;
        let taps = taps(data, &[]);
        let bias = taps.bias(&BiasRegion::default()).unwrap();
        assert!(bias[[1, 0]].is_nan());
        assert_eq!(bias[[0, 0]], 0.0);
    }

    #[test]
    fn test_unbiased_has_zero_bias() {
        let data = ArrayD::from_shape_fn(IxDyn(&[2, 8, 24]), |i| {
            50.0 + 7.0 * i[0] as f64 + (i[1] * i[2]) as f64 * 0.01
        });
        let taps = taps(data, &["t"]);
        let region = BiasRegion::default();
        let unbiased = taps.unbiased_with(&region).unwrap();
        assert_eq!(unbiased.data().shape(), taps.data().shape());
        for b in unbiased.bias(&region).unwrap().iter() {
            assert_abs_diff_eq!(*b, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_active_shrinks_x_only() {
        let taps = taps(ArrayD::zeros(IxDyn(&[8, 24])), &[]);
        let active = taps.active().unwrap();
        assert_eq!(active.num_x(), 12 - 3 - 2);
        assert_eq!(active.num_y(), taps.num_y());
        assert_eq!(active.pixel().x, array![[3, 4, 5, 6, 7, 8, 9], [20, 19, 18, 17, 16, 15, 14]]);
        assert_eq!(active.pixel().y, taps.pixel().y);
    }

    #[test]
    fn test_active_rejects_narrow_taps() {
        let taps = taps(ArrayD::zeros(IxDyn(&[8, 8])), &[]);
        assert!(matches!(taps.active(), Err(CcdError::Shape(_))));
    }

    #[test]
    fn test_frame_level_operations() {
        let data = ArrayD::from_shape_fn(IxDyn(&[8, 24]), |i| 10.0 + (i[0] + i[1]) as f64);
        let frame = frame_from(data, &[]);

        let active = frame.active().unwrap();
        assert_eq!(active.num_x(), 24 - 2 * (3 + 2));
        assert_eq!(active.num_y(), 8);
        assert_eq!(
            active.pixel().x,
            array![[3, 4, 5, 6, 7, 8, 9, 14, 15, 16, 17, 18, 19, 20]]
        );

        let unbiased = frame.unbiased().unwrap();
        assert_eq!(unbiased.data().shape(), frame.data().shape());
        let again = unbiased.taps(&SplitConfig::default()).unwrap();
        for b in again.bias(&BiasRegion::default()).unwrap().iter() {
            assert_abs_diff_eq!(*b, 0.0, epsilon = 1e-9);
        }
    }
}
