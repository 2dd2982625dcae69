pub mod codec;
pub mod metrics;
pub mod monitor;
pub mod refine;
pub mod scoring;
pub mod slide;
