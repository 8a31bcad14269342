// HTTP routes
pub mod change_requests;
pub mod health;

pub use change_requests::*;
pub use health::*;
