pub mod compound;
pub mod metrics;
pub mod normalizer;
pub mod providers;

pub use compound::CompoundService;
pub use normalizer::normalize;
