use std::io::{Cursor, Write};

use ndarray::ArrayView2;
use tiff::encoder::{TiffEncoder, colortype};
use tiff::tags::Tag;
use tracing::debug;

use crate::ccd::common::error::{CcdError, Result};
use crate::ccd::frame::header::HeaderRecord;
use crate::ccd::io::types::{RawFrame, TiffCompression};
use crate::ccd::io::writer::FrameWriter;
use crate::ccd::pipeline::config::PipelineConfig;

/// Writes calibrated frames as 32-bit float grayscale TIFF.
pub struct TiffFrameWriter;

fn encode_error(e: tiff::TiffError) -> CcdError {
    CcdError::EncodeError(e.to_string())
}

fn dimensions(width: usize, height: usize) -> Result<(u32, u32)> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(CcdError::InvalidDimensions(width, height)),
    }
}

impl FrameWriter for TiffFrameWriter {
    fn write_frame(
        &self,
        image: ArrayView2<'_, f64>,
        record: &HeaderRecord,
        output: &mut dyn Write,
        config: &PipelineConfig,
    ) -> Result<()> {
        let (height, width) = image.dim();
        debug!("Encoding calibrated TIFF frame: {}x{}", width, height);
        let (w, h) = dimensions(width, height)?;

        let pixels: Vec<f32> = image.iter().map(|&v| v as f32).collect();
        let description = record.describe();

        let mut buffer = Vec::new();
        {
            let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
                .map_err(encode_error)?
                .with_compression(config.compression.into());

            let mut tiff_image = encoder
                .new_image::<colortype::Gray32Float>(w, h)
                .map_err(encode_error)?;
            tiff_image
                .encoder()
                .write_tag(Tag::ImageDescription, description.as_str())
                .map_err(encode_error)?;
            tiff_image.write_data(&pixels).map_err(encode_error)?;
        }

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}

/// Encode a raw frame as a 16-bit grayscale TIFF with its telemetry in the
/// `ImageDescription` tag, the layout read back by
/// [`TiffFrameReader`](crate::ccd::io::TiffFrameReader).
pub fn encode_raw_frame(frame: &RawFrame, compression: TiffCompression) -> Result<Vec<u8>> {
    let (w, h) = dimensions(frame.width(), frame.height())?;
    let pixels: Vec<u16> = frame.raster.iter().copied().collect();
    let description = frame.telemetry.to_header();

    let mut buffer = Vec::new();
    {
        let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
            .map_err(encode_error)?
            .with_compression(compression.into());
        let mut tiff_image = encoder
            .new_image::<colortype::Gray16>(w, h)
            .map_err(encode_error)?;
        tiff_image
            .encoder()
            .write_tag(Tag::ImageDescription, description.as_str())
            .map_err(encode_error)?;
        tiff_image.write_data(&pixels).map_err(encode_error)?;
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ccd::frame::header::tests::{sample_record, sample_telemetry};
    use crate::ccd::frame::telemetry::keys;
    use crate::ccd::io::reader::FrameReader;
    use crate::ccd::io::tiff_reader::TiffFrameReader;
    use ndarray::Array2;
    use tiff::decoder::{Decoder, DecodingResult};

    fn raw_frame() -> RawFrame {
        RawFrame {
            raster: Array2::from_shape_fn((4, 6), |(y, x)| (100 * y + x) as u16),
            telemetry: sample_telemetry(400_000_000, "SN-7"),
        }
    }

    #[test]
    fn test_raw_frame_is_read_back() {
        for compression in [TiffCompression::None, TiffCompression::DeflateBalanced] {
            let frame = raw_frame();
            let bytes = encode_raw_frame(&frame, compression).unwrap();
            let decoded = TiffFrameReader.read_frame(&bytes).unwrap();
            assert_eq!(decoded.raster, frame.raster);
            assert_eq!(decoded.telemetry.text(keys::SERIAL_NUMBER), Some("SN-7"));
            assert_eq!(decoded.telemetry.count(keys::TIMEDELTA).unwrap(), 400_000_000);
        }
    }

    #[test]
    fn test_reader_rejects_garbage() {
        let result = TiffFrameReader.read_frame(b"not a tiff");
        assert!(matches!(result, Err(CcdError::DecodeError(_))));
    }

    #[test]
    fn test_calibrated_frame_encoding() {
        let image = Array2::from_shape_fn((3, 5), |(y, x)| y as f64 - 0.5 * x as f64);
        let mut output = Vec::new();
        TiffFrameWriter
            .write_frame(image.view(), &sample_record(), &mut output, &PipelineConfig::default())
            .unwrap();

        let mut decoder = Decoder::new(Cursor::new(&output)).unwrap();
        assert_eq!(decoder.dimensions().unwrap(), (5, 3));
        let description = decoder
            .find_tag(Tag::ImageDescription)
            .unwrap()
            .unwrap()
            .into_string()
            .unwrap();
        assert!(description.contains("SERIAL_NUMBER = 'SN-001'"));
        match decoder.read_image().unwrap() {
            DecodingResult::F32(pixels) => {
                assert_eq!(pixels.len(), 15);
                assert_eq!(pixels[6], 0.5);
            }
            _ => panic!("expected 32-bit float samples"),
        }
    }
}
