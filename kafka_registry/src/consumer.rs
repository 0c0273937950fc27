mod consumer_wrapper;
mod partition_offset;

pub use consumer_wrapper::*;
pub use partition_offset::*;
