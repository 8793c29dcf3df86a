use crate::ccd::common::error::Result;
use crate::ccd::io::types::RawFrame;

pub trait FrameReader {
    fn read_frame(&self, data: &[u8]) -> Result<RawFrame>;
}
