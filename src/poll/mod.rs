//! Poll module - periodic refresh of the tank reading
//!
//! The coordinator owns the session client and the published state; the
//! scheduler decides when the coordinator runs.

mod coordinator;
mod scheduler;

pub use coordinator::PollCoordinator;
pub use scheduler::run;
