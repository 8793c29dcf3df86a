//! Raw frame reader for single-image grayscale TIFF files.
//!
//! The camera telemetry travels in the `ImageDescription` tag as a textual
//! header of `KEY = value / comment` lines.

use std::io::Cursor;

use ndarray::Array2;
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tracing::{debug, warn};

use crate::ccd::common::error::{CcdError, Result};
use crate::ccd::frame::telemetry::Telemetry;
use crate::ccd::io::reader::FrameReader;
use crate::ccd::io::types::RawFrame;

/// Reads 16-bit grayscale TIFF rasters.
pub struct TiffFrameReader;

fn decode_error(e: tiff::TiffError) -> CcdError {
    CcdError::DecodeError(e.to_string())
}

impl FrameReader for TiffFrameReader {
    fn read_frame(&self, data: &[u8]) -> Result<RawFrame> {
        debug!("Decoding TIFF frame, {} bytes", data.len());

        let mut decoder = Decoder::new(Cursor::new(data)).map_err(decode_error)?;
        let (width, height) = decoder.dimensions().map_err(decode_error)?;

        match decoder.colortype().map_err(decode_error)? {
            ColorType::Gray(16) => {}
            other => {
                return Err(CcdError::DecodeError(format!(
                    "expected a 16-bit grayscale raster, found {other:?}"
                )));
            }
        }

        let telemetry = match decoder
            .find_tag(Tag::ImageDescription)
            .map_err(decode_error)?
        {
            Some(value) => Telemetry::parse_header(&value.into_string().map_err(decode_error)?),
            None => {
                warn!("TIFF frame has no telemetry header");
                Telemetry::new()
            }
        };

        let pixels = match decoder.read_image().map_err(decode_error)? {
            DecodingResult::U16(pixels) => pixels,
            _ => {
                return Err(CcdError::DecodeError(
                    "raster samples are not 16-bit integers".to_string(),
                ));
            }
        };

        let raster = Array2::from_shape_vec((height as usize, width as usize), pixels)?;
        debug!(width, height, keys = telemetry.len(), "Decoded TIFF frame");

        Ok(RawFrame { raster, telemetry })
    }
}
