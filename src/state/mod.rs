//! State module for tracking session and polling progress
//!
//! # Components
//!
//! - `SessionState`: Tracks whether the portal session is logged in, expired, or closed
//! - `PollState`: The last good reading plus the outcome of the most recent poll cycle

mod poll_state;
mod session_state;

// Re-export main types
pub use poll_state::PollState;
pub use session_state::SessionState;
