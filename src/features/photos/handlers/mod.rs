pub mod photo_handler;
pub mod upload_handler;

pub use photo_handler::*;
pub use upload_handler::*;
