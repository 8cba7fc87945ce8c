pub mod collector;
pub mod metrics;
pub mod platform;
pub mod process;
pub mod sampler;
pub mod snapshot;
pub mod source;
