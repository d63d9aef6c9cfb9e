//! Small dependency-free helpers shared by the lab primitives.

pub mod det_rng;

pub use det_rng::DetRng;
