use thiserror::Error;

#[derive(Error, Debug)]
pub enum CcdError {
    #[error("Calibration domain error: {0}")]
    Domain(String),

    #[error("Shape error: {0}")]
    Shape(String),

    #[error("Range error: {0}")]
    Range(String),

    #[error("Invalid sensor geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Missing telemetry field: {0}")]
    MissingTelemetry(String),

    #[error("Invalid telemetry field {key}: {value:?}")]
    InvalidTelemetry { key: String, value: String },

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode frame: {0}")]
    DecodeError(String),

    #[error("Failed to encode frame: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<ndarray::ShapeError> for CcdError {
    fn from(e: ndarray::ShapeError) -> Self {
        CcdError::Shape(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CcdError>;
