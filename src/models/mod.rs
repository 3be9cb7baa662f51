// Domain models

mod prediction;
mod sample;
mod status;

pub use prediction::Prediction;
pub use sample::{MonitorSnapshot, Sample};
pub use status::{SCALING_ACTION, SystemStatus};
