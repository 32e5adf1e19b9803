pub mod sampler;

pub use sampler::{ATTEMPT_MULTIPLIER, SampleReport, generate};
