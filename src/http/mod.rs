pub mod headers;
pub mod message;

pub use headers::{RequestHeader, find_header, host};
pub use message::{RequestInfo, build_message};
