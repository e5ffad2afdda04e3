//! Terminal front end for the tax saving assistant
//!
//! The transcript loop is generic over the reader and writer so it runs
//! against stdin/stdout in the binary and in-memory buffers in tests.

pub mod session;

pub use session::{run_session, SessionEnd};
