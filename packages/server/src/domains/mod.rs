// Business domains
pub mod change_requests;
pub mod dictionary;
