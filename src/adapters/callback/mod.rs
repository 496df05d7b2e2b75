//! Callback notifier adapters.
//!
//! - **HttpCallbackNotifier** - JSON POST with a per-request timeout
//! - **RecordingCallbackNotifier** - In-memory, for tests

mod http_callback_notifier;
mod recording;

pub use http_callback_notifier::HttpCallbackNotifier;
pub use recording::RecordingCallbackNotifier;
