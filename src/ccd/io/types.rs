//! Frame I/O data types

use ndarray::Array2;

use crate::ccd::frame::telemetry::Telemetry;

/// A decoded raw frame: the pixel counts and the telemetry stored alongside them.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    /// Pixel counts laid out as `[y, x]`
    pub raster: Array2<u16>,
    pub telemetry: Telemetry,
}

impl RawFrame {
    pub fn width(&self) -> usize {
        self.raster.ncols()
    }

    pub fn height(&self) -> usize {
        self.raster.nrows()
    }
}

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression
    Lzw,
    /// Deflate compression - fast level
    DeflateFast,
    /// Deflate compression - balanced
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}

impl From<TiffCompression> for tiff::encoder::Compression {
    fn from(compression: TiffCompression) -> Self {
        use tiff::encoder::Compression;
        use tiff::encoder::compression::DeflateLevel;

        match compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        }
    }
}
