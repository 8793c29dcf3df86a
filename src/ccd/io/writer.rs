use std::io::Write;

use ndarray::ArrayView2;

use crate::ccd::common::error::Result;
use crate::ccd::frame::header::HeaderRecord;
use crate::ccd::pipeline::config::PipelineConfig;

/// Encodes one calibrated `[y, x]` image together with its metadata.
pub trait FrameWriter {
    fn write_frame(
        &self,
        image: ArrayView2<'_, f64>,
        record: &HeaderRecord,
        output: &mut dyn Write,
        config: &PipelineConfig,
    ) -> Result<()>;
}
