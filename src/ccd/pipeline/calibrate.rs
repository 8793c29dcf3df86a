use std::io::Write;
use std::path::{Path, PathBuf};

use ndarray::{Array2, Axis, stack};
use tracing::{info, instrument, warn};

use crate::ccd::common::error::{CcdError, Result};
use crate::ccd::frame::axes::ImageAxes;
use crate::ccd::frame::sensor_frame::SensorFrame;
use crate::ccd::frame::telemetry::Telemetry;
use crate::ccd::io::{FrameReader, FrameWriter, RawFrame, TiffFrameReader, TiffFrameWriter};
use crate::ccd::pipeline::config::PipelineConfig;
use crate::ccd::sensor::Camera;
use crate::ccd::units::TimeExt;

/// Suffix appended to the input file stem to name calibrated outputs.
pub const OUTPUT_SUFFIX: &str = "_calibrated";

/// Decodes raw frames, calibrates them as one batch and encodes the results.
pub struct CalibrationPipeline<R: FrameReader, W: FrameWriter> {
    reader: R,
    writer: W,
    camera: Camera,
    config: PipelineConfig,
}

impl CalibrationPipeline<TiffFrameReader, TiffFrameWriter> {
    pub fn new(camera: Camera, config: PipelineConfig) -> Self {
        Self {
            reader: TiffFrameReader,
            writer: TiffFrameWriter,
            camera,
            config,
        }
    }
}

impl<R: FrameReader, W: FrameWriter> CalibrationPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, camera: Camera, config: PipelineConfig) -> Self {
        Self {
            reader,
            writer,
            camera,
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(CcdError::InvalidDimensions(width, height));
        }

        let sensor = &self.camera.sensor;
        let expected = (
            sensor.num_pixel_x.unwrap_or(width),
            sensor.num_pixel_y.unwrap_or(height),
        );
        if (width, height) != expected {
            return Err(CcdError::Shape(format!(
                "raster is {width}x{height} but the sensor is {}x{}",
                expected.0, expected.1
            )));
        }

        Ok(())
    }

    fn check_saturation(&self, frame: &RawFrame) {
        let level = self.camera.saturation_level();
        let saturated = frame
            .raster
            .iter()
            .filter(|&&count| f64::from(count) >= level)
            .count();
        if saturated > 0 {
            warn!(saturated, level, "Frame contains saturated pixels");
        }
    }

    fn check_exposure(&self, frame: &SensorFrame) -> Result<()> {
        for index in frame.batch_indices() {
            let requested = frame.header().record(&index)?.timedelta_requested;
            if !self.camera.exposure_in_range(requested) {
                warn!(
                    ?index,
                    requested_s = requested.as_seconds(),
                    min_s = self.camera.timedelta_exposure_min.as_seconds(),
                    max_s = self.camera.timedelta_exposure_max.as_seconds(),
                    "Requested exposure is outside the supported range"
                );
            }
        }
        Ok(())
    }

    /// Decode `inputs` and stack them into one frame along the batch axis.
    #[instrument(skip(self, inputs), fields(frames = inputs.len()))]
    pub fn decode<B: AsRef<[u8]>>(&self, inputs: &[B]) -> Result<SensorFrame> {
        if inputs.is_empty() {
            return Err(CcdError::Shape("no input frames to calibrate".to_string()));
        }

        let mut rasters: Vec<Array2<f64>> = Vec::with_capacity(inputs.len());
        let mut telemetry: Vec<Telemetry> = Vec::with_capacity(inputs.len());
        for input in inputs {
            let raw = {
                let _span = tracing::info_span!("decode_frame").entered();
                self.reader.read_frame(input.as_ref())?
            };
            {
                let _span = tracing::info_span!(
                    "validate_dimensions",
                    width = raw.width(),
                    height = raw.height()
                )
                .entered();
                self.validate_dimensions(raw.width(), raw.height())?;
            }
            self.check_saturation(&raw);
            rasters.push(raw.raster.mapv(f64::from));
            telemetry.push(raw.telemetry);
        }

        let _span = tracing::info_span!("build_sensor_frame").entered();
        let views: Vec<_> = rasters.iter().map(|raster| raster.view()).collect();
        let data = stack(Axis(0), &views)?.into_dyn();
        let axes = ImageAxes::default().with_batch([self.config.batch_axis.clone()]);
        let frame = SensorFrame::new(data, &telemetry, self.camera.sensor.clone(), axes)?;
        self.check_exposure(&frame)?;
        Ok(frame)
    }

    /// Apply the configured bias removal and cropping.
    #[instrument(skip(self, frame), fields(shape = ?frame.data().shape()))]
    pub fn calibrate(&self, frame: SensorFrame) -> Result<SensorFrame> {
        let mut frame = frame;
        if self.config.remove_bias {
            let _span = tracing::info_span!("remove_bias").entered();
            frame = frame.unbiased_with(&self.config.split, &self.config.bias_region)?;
        }
        if self.config.crop_active {
            let _span = tracing::info_span!("crop_active").entered();
            frame = frame.active_with(&self.config.split)?;
        }
        Ok(frame)
    }

    /// Encode every batch element of `frame` to the matching output.
    pub fn encode<O: Write>(&self, frame: &SensorFrame, outputs: &mut [O]) -> Result<()> {
        let indices = frame.batch_indices();
        if indices.len() != outputs.len() {
            return Err(CcdError::Shape(format!(
                "{} outputs for {} frames",
                outputs.len(),
                indices.len()
            )));
        }

        let _span = tracing::info_span!("encode_frame").entered();
        for (index, output) in indices.iter().zip(outputs.iter_mut()) {
            let image = frame.image(index)?;
            let record = frame.header().record(index)?;
            self.writer.write_frame(image, &record, output, &self.config)?;
        }
        Ok(())
    }

    /// Calibrate a batch of encoded raw frames, writing one output per input.
    #[instrument(skip(self, inputs, outputs), fields(frames = inputs.len()))]
    pub fn process<B: AsRef<[u8]>, O: Write>(
        &self,
        inputs: &[B],
        outputs: &mut [O],
    ) -> Result<SensorFrame> {
        info!("Starting frame calibration");

        let frame = self.calibrate(self.decode(inputs)?)?;
        self.encode(&frame, outputs)?;

        info!(
            frames = inputs.len(),
            width = frame.num_x(),
            height = frame.num_y(),
            "Calibration complete"
        );
        Ok(frame)
    }

    /// Calibrate a single encoded raw frame.
    pub fn convert(&self, input: &[u8], output: &mut dyn Write) -> Result<()> {
        self.process(&[input], &mut [output])?;
        Ok(())
    }

    /// Calibrate the files at `input_paths` as one batch, writing
    /// `<stem>_calibrated.tiff` files into `output_dir`.
    #[instrument(skip(self, input_paths, output_dir))]
    pub fn process_files<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_paths: &[P],
        output_dir: Q,
    ) -> Result<Vec<PathBuf>> {
        let output_dir = output_dir.as_ref();

        let inputs = {
            let _span = tracing::info_span!("read_input_file").entered();
            input_paths
                .iter()
                .map(|path| {
                    let path = path.as_ref();
                    std::fs::read(path).map_err(|e| {
                        CcdError::InputReadError(format!("{}: {}", path.display(), e))
                    })
                })
                .collect::<Result<Vec<_>>>()?
        };

        let output_paths: Vec<PathBuf> = input_paths
            .iter()
            .map(|path| output_path(path.as_ref(), output_dir))
            .collect();

        let mut output_files = {
            let _span = tracing::info_span!("create_output_file").entered();
            std::fs::create_dir_all(output_dir).map_err(|e| {
                CcdError::OutputWriteError(format!("{}: {}", output_dir.display(), e))
            })?;
            output_paths
                .iter()
                .map(|path| {
                    std::fs::File::create(path).map_err(|e| {
                        CcdError::OutputWriteError(format!("{}: {}", path.display(), e))
                    })
                })
                .collect::<Result<Vec<_>>>()?
        };

        for (input, output) in input_paths.iter().zip(&output_paths) {
            info!(
                input = %input.as_ref().display(),
                output = %output.display(),
                "Calibrating file"
            );
        }

        self.process(&inputs, &mut output_files)?;

        Ok(output_paths)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PipelineConfig) {
        self.config = config;
    }
}

/// Path of the calibrated output for `input` inside `output_dir`.
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{stem}{OUTPUT_SUFFIX}.tiff"))
}
