pub mod active_session;
pub mod registry;

pub use registry::{SessionRegistry, SessionTiming};
