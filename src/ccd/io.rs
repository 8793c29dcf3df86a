//! Frame I/O module
//!
//! Decoding of header-bearing raw rasters and encoding of calibrated frames.

mod reader;
mod tiff_reader;
mod tiff_writer;
pub mod types;
mod writer;

pub use reader::FrameReader;
pub use tiff_reader::TiffFrameReader;
pub use tiff_writer::{TiffFrameWriter, encode_raw_frame};
pub use types::{RawFrame, TiffCompression};
pub use writer::FrameWriter;
