//! Port implementations.
//!
//! `live` talks to the real world; `replaying` serves cassettes in tests.

pub mod live;
pub mod replaying;
