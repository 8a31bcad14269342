pub mod queries;
pub mod review;
pub mod submit;

pub use queries::{count_pending_requests, get_request, list_pending_requests, list_requests_for_entity};
pub use review::{approve_request, cancel_request, reject_request};
pub use submit::submit_request;
