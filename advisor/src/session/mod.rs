//! Per-session conversation storage and session detection.

mod cookie;
mod store;

pub use cookie::{detect_session_id, set_session_cookie, SESSION_COOKIE};
pub use store::{SessionHandle, SessionStore};
