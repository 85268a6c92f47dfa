//! Cassettes: recorded port interactions served back in order during tests.

pub mod format;
pub mod replayer;

pub use format::{Cassette, Interaction};
pub use replayer::CassetteReplayer;
