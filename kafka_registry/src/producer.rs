mod producer_wrapper;
mod round_robin;

pub use producer_wrapper::*;
pub use round_robin::*;
