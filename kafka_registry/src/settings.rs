mod broker_settings;
mod partitioner;

pub use broker_settings::*;
pub use partitioner::*;
