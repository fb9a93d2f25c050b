//! Visitor sessions
//!
//! Every request carries a `SessionId` extension, taken from the session
//! cookie or freshly generated.

pub mod cookie;

pub use cookie::session_middleware;
