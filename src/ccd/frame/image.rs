//! The closed set of image variants and the operations they share.

use crate::ccd::common::error::Result;
use crate::ccd::frame::axes::FrameMeta;
use crate::ccd::frame::header::FrameHeader;
use crate::ccd::frame::sensor_frame::SensorFrame;
use crate::ccd::frame::tap_frame::TapFrame;

#[derive(Debug, Clone, PartialEq)]
pub enum ImageFrame {
    Sensor(SensorFrame),
    Taps(TapFrame),
}

impl From<SensorFrame> for ImageFrame {
    fn from(frame: SensorFrame) -> Self {
        ImageFrame::Sensor(frame)
    }
}

impl From<TapFrame> for ImageFrame {
    fn from(frame: TapFrame) -> Self {
        ImageFrame::Taps(frame)
    }
}

pub fn meta(image: &ImageFrame) -> &FrameMeta {
    match image {
        ImageFrame::Sensor(frame) => frame.meta(),
        ImageFrame::Taps(frame) => frame.meta(),
    }
}

pub fn header(image: &ImageFrame) -> &FrameHeader {
    &meta(image).header
}

pub fn num_x(image: &ImageFrame) -> usize {
    match image {
        ImageFrame::Sensor(frame) => frame.num_x(),
        ImageFrame::Taps(frame) => frame.num_x(),
    }
}

pub fn num_y(image: &ImageFrame) -> usize {
    match image {
        ImageFrame::Sensor(frame) => frame.num_y(),
        ImageFrame::Taps(frame) => frame.num_y(),
    }
}

/// A copy of `image` with the bias removed, keeping its variant.
pub fn unbiased(image: &ImageFrame) -> Result<ImageFrame> {
    Ok(match image {
        ImageFrame::Sensor(frame) => frame.unbiased()?.into(),
        ImageFrame::Taps(frame) => frame.unbiased()?.into(),
    })
}

/// A copy of `image` without the blank and overscan columns, keeping its variant.
pub fn active(image: &ImageFrame) -> Result<ImageFrame> {
    Ok(match image {
        ImageFrame::Sensor(frame) => frame.active()?.into(),
        ImageFrame::Taps(frame) => frame.active()?.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ccd::frame::axes::ImageAxes;
    use crate::ccd::frame::header::tests::sample_record;
    use crate::ccd::sensor::SensorGeometry;
    use crate::ccd::taps::SplitConfig;
    use ndarray::{ArrayD, IxDyn};
    use std::sync::Arc;

    fn sensor_image() -> ImageFrame {
        let geometry = SensorGeometry::builder()
            .num_pixel(12, 4)
            .num_blank(1)
            .num_overscan(1)
            .build()
            .unwrap();
        let data = ArrayD::from_shape_fn(IxDyn(&[4, 12]), |i| (i[0] + i[1]) as f64);
        SensorFrame::from_parts(
            data,
            FrameHeader::uniform(sample_record()),
            Arc::new(geometry),
            ImageAxes::default(),
        )
        .unwrap()
        .into()
    }

    #[test]
    fn test_dispatch_keeps_variant() {
        let sensor = sensor_image();
        let taps: ImageFrame = match &sensor {
            ImageFrame::Sensor(frame) => frame.taps(&SplitConfig::default()).unwrap().into(),
            ImageFrame::Taps(_) => unreachable!(),
        };

        assert_eq!((num_x(&sensor), num_y(&sensor)), (12, 4));
        assert_eq!((num_x(&taps), num_y(&taps)), (6, 2));
        assert_eq!(header(&sensor), header(&taps));

        assert!(matches!(unbiased(&sensor).unwrap(), ImageFrame::Sensor(_)));
        assert!(matches!(unbiased(&taps).unwrap(), ImageFrame::Taps(_)));

        assert_eq!(num_x(&active(&sensor).unwrap()), 12 - 2 * 2);
        assert_eq!(num_x(&active(&taps).unwrap()), 6 - 2);
    }
}
