//! Moderated change requests.
//!
//! Contributors submit proposed creates, updates and deletes of dictionary
//! entities. Administrators approve or reject them; approval runs the handler
//! registered for the request's (entity kind, action) inside one transaction.

pub mod activities;
pub mod dependencies;
pub mod error;
pub mod handlers;
pub mod models;
pub mod payloads;

pub use activities::*;
pub use error::{ChangeRequestError, Result};
pub use handlers::{get_handler, Applied, ChangeHandler, HandlerRegistry};
pub use models::{Action, ChangeRequest, EntityKind, NewChangeRequest, PendingFilter, RequestStatus};
pub use payloads::AttributeRef;
