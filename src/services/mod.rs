pub mod extractor;
pub mod provider;

pub use provider::DistroWatchProvider;
