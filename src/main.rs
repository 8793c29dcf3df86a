use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use msfc_ccd_rs::ccd::{
    BiasRegion, CalibrationPipeline, Camera, PipelineConfig, SplitConfig, TiffCompression,
};
use msfc_ccd_rs::logger;

use tracing::{error, info};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Compression {
    None,
    Lzw,
    DeflateFast,
    DeflateBalanced,
    DeflateBest,
}

impl From<Compression> for TiffCompression {
    fn from(compression: Compression) -> Self {
        match compression {
            Compression::None => TiffCompression::None,
            Compression::Lzw => TiffCompression::Lzw,
            Compression::DeflateFast => TiffCompression::DeflateFast,
            Compression::DeflateBalanced => TiffCompression::DeflateBalanced,
            Compression::DeflateBest => TiffCompression::DeflateBest,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Calibrate raw tapped-CCD frames", long_about = None)]
struct Args {
    #[arg(required = true, help = "Raw TIFF frames, calibrated together as one batch")]
    inputs: Vec<PathBuf>,

    #[arg(short, long, help = "Directory for the calibrated frames", default_value = ".")]
    output_dir: PathBuf,

    #[arg(long, help = "Keep the per-tap bias in the output")]
    keep_bias: bool,

    #[arg(long, help = "Crop the blank and overscan columns")]
    active: bool,

    #[arg(long, help = "Reject frames whose extent does not split evenly into taps")]
    strict: bool,

    #[arg(long, default_value_t = 0, help = "Blank columns per tap used for the bias")]
    bias_blank: usize,

    #[arg(long, help = "Overscan columns per tap used for the bias (all if omitted)")]
    bias_overscan: Option<usize>,

    #[arg(short, long, value_enum, default_value = "none", help = "Output compression")]
    compression: Compression,
}

fn main() -> Result<()> {
    logger::init();

    let args = Args::parse();
    info!("Starting msfc_ccd...");

    let bias_region = BiasRegion::new(Some(args.bias_blank), args.bias_overscan);
    let config = PipelineConfig::builder()
        .split(SplitConfig::builder().strict(args.strict).build())
        .bias_region(bias_region)
        .remove_bias(!args.keep_bias)
        .crop_active(args.active)
        .compression(args.compression.into())
        .build();
    let pipeline = CalibrationPipeline::new(Camera::default(), config);

    info!("Calibration pipeline initialized");
    info!("Compression: {:?}", pipeline.config().compression);
    info!(
        "Bias removal: {}",
        if pipeline.config().remove_bias {
            "enabled"
        } else {
            "disabled"
        }
    );

    match pipeline.process_files(&args.inputs, &args.output_dir) {
        Ok(outputs) => {
            for output in &outputs {
                info!(output = %output.display(), "Wrote calibrated frame");
            }
            info!("Calibration successful!");
            Ok(())
        }
        Err(e) => {
            error!("Calibration failed: {}", e);
            Err(e).context("calibrating input frames")
        }
    }
}
