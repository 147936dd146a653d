//! Swap module - allowance check, approval and swap for a single request

mod coordinator;
mod types;

pub use coordinator::SwapCoordinator;
pub use types::{SwapOutcome, SwapRequest};
