// Collaborative dictionary - core library
//
// Contributors propose changes to dictionary content as change requests;
// administrators approve or reject them, and approved requests are applied to
// the canonical store in a single transaction.

pub mod common;
pub mod config;
pub mod domains;
pub mod server;

pub use config::*;
