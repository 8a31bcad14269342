pub mod change_request;
pub mod kinds;

pub use change_request::{ChangeRequest, NewChangeRequest, PendingFilter};
pub use kinds::{Action, EntityKind, RequestStatus};
