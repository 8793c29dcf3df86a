pub mod bias;
pub mod config;
pub mod recombiner;
pub mod splitter;

pub use config::{BiasRegion, SplitConfig, SplitConfigBuilder};
pub use recombiner::recombine;
pub use splitter::split;
