//! Platform gateway adapters.
//!
//! The chat-platform client itself lives outside this crate. These adapters
//! cover running without one and observing calls in tests.
//!
//! - **DetachedPlatformGateway** - No platform connected; denies everything
//! - **RecordingPlatformGateway** - Scriptable gateway that records mutations

mod detached;
mod recording;

pub use detached::DetachedPlatformGateway;
pub use recording::{GatewayAction, RecordingPlatformGateway};
