mod handler;
mod message_handler;
mod models;

pub use handler::*;
pub use message_handler::*;
pub use models::*;
