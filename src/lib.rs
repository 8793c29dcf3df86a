pub mod ccd;
pub mod logger;
